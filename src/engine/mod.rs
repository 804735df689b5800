//! Core simulation engine.
//!
//! Implements the per-frame simulation step with:
//! - Semi-implicit Euler integration of the damped pendulum
//! - A fixed-capacity sample ring that wraps and reseeds when full
//! - Jidoka guards for stop-on-error
//!
//! [`Simulation`] owns all mutable run state; the frame loop owns the
//! `Simulation`.

pub mod integrator;
pub mod jidoka;
pub mod ring;

pub use integrator::{Integrator, PendulumConstants, PhaseState};
pub use jidoka::{JidokaGuard, JidokaWarning};
pub use ring::{Advance, Sample, SampleRing};

use crate::config::PendulumConfig;
use crate::error::SimResult;

/// Outcome of one [`Simulation::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Ring movement and the transient acceleration.
    pub advance: Advance,
    /// Non-fatal diagnostics raised by the guard.
    pub warnings: Vec<JidokaWarning>,
}

/// Pendulum simulation state.
pub struct Simulation {
    constants: PendulumConstants,
    initial: PhaseState,
    ring: SampleRing,
    integrator: Box<dyn Integrator + Send>,
    guard: JidokaGuard,
    step_count: u64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("constants", &self.constants)
            .field("integrator", &self.integrator.name())
            .field("cursor", &self.ring.cursor())
            .field("capacity", &self.ring.capacity())
            .field("step_count", &self.step_count)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Build a simulation from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(config: &PendulumConfig) -> SimResult<Self> {
        config.validate_all()?;
        let constants = config.constants()?;
        let initial = config.initial_state();
        let ring = SampleRing::new(config.capacity()?, initial, constants.length())?;

        tracing::debug!(
            capacity = ring.capacity(),
            integrator = ?config.timestep.integrator,
            "simulation initialized"
        );

        Ok(Self {
            constants,
            initial,
            ring,
            integrator: config.timestep.integrator.build(),
            guard: JidokaGuard::new(config.jidoka.clone()),
            step_count: 0,
        })
    }

    /// Advance one sample and run the Jidoka checks on it.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteValue` if the new sample or the acceleration is
    /// NaN/Inf. The ring has already moved at that point; callers stop
    /// stepping.
    pub fn step(&mut self) -> SimResult<StepReport> {
        let advance = self.ring.advance(&self.constants, self.integrator.as_ref());
        self.step_count += 1;
        let warnings = self.guard.check(&advance)?;
        Ok(StepReport { advance, warnings })
    }

    /// View of the current sample without stepping, for the first frame and
    /// for paused frames.
    #[must_use]
    pub fn snapshot(&self) -> Advance {
        let current = self.ring.current();
        Advance {
            cursor: self.ring.cursor(),
            previous: current,
            current,
            acceleration: integrator::acceleration(current.s, current.v, &self.constants),
            wrapped: false,
        }
    }

    /// Return to the initial condition.
    pub fn reset(&mut self) {
        self.ring.reset(self.initial);
        self.guard.reset();
        self.step_count = 0;
    }

    /// Physical constants.
    #[must_use]
    pub const fn constants(&self) -> &PendulumConstants {
        &self.constants
    }

    /// Sample history.
    #[must_use]
    pub const fn ring(&self) -> &SampleRing {
        &self.ring
    }

    /// Active integrator.
    #[must_use]
    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    /// Steps taken since creation or the last reset.
    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Jidoka guard state.
    #[must_use]
    pub const fn guard(&self) -> &JidokaGuard {
        &self.guard
    }
}
