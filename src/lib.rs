//! # pendulum
//!
//! Damped pendulum simulator.
//!
//! - Semi-implicit Euler integration with quadratic drag
//! - A fixed-capacity sample ring that wraps and reseeds from its last sample
//! - Jidoka guards that stop on NaN/Inf
//! - Platform-agnostic render commands, painted by the terminal front end
//!
//! ## Example
//!
//! ```rust
//! use pendulum::prelude::*;
//!
//! let config = PendulumConfig::builder()
//!     .initial_angle_deg(30.0)
//!     .build();
//! let mut sim = Simulation::new(&config)?;
//!
//! let report = sim.step()?;
//! assert_eq!(report.advance.cursor, 1);
//! # Ok::<(), pendulum::SimError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::imprecise_flops,
    clippy::missing_const_for_fn,
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod render;
pub mod tui;

/// Crate version, stamped by the build script.
pub const VERSION: &str = env!("PENDULUM_VERSION");

/// Short git hash of the build, when built from a checkout.
pub const GIT_HASH: Option<&str> = option_env!("GIT_HASH");

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{IntegratorType, PendulumConfig, PendulumConfigBuilder};
    pub use crate::engine::jidoka::{JidokaGuard, JidokaWarning};
    pub use crate::engine::{
        Advance, Integrator, PendulumConstants, PhaseState, Sample, SampleRing, Simulation,
        StepReport,
    };
    pub use crate::error::{SimError, SimResult};
    pub use crate::render::{render_frame, to_screen, RenderCommand, Surface};
}

/// Re-export for public API
pub use error::{SimError, SimResult};
