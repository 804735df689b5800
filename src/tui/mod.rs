//! TUI module for the pendulum.
//!
//! This module contains reusable TUI application state and logic
//! extracted from the binary to enable testing.
//!
//! The actual terminal I/O remains in `bin/pendulum_tui.rs`, but all
//! testable state management lives here.

#[cfg(feature = "tui")]
pub mod frame_budget;
#[cfg(feature = "tui")]
pub mod pendulum_app;

#[cfg(feature = "tui")]
pub use frame_budget::FrameBudget;
#[cfg(feature = "tui")]
pub use pendulum_app::PendulumApp;
