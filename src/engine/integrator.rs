//! Pendulum equation of motion and fixed-step integrators.
//!
//! The angular acceleration combines quadratic drag and the gravitational
//! restoring term:
//!
//! ```text
//! a = -(D/m)·v·|v| - g·sin(s/L)
//! ```
//!
//! The default scheme is semi-implicit (symplectic) Euler:
//!
//! ```text
//! v_{n+1} = v_n + a(s_n, v_n)·dt
//! s_{n+1} = s_n + v_{n+1}·dt
//! ```
//!
//! Using the updated velocity for the position update keeps the long-run
//! energy error bounded; plain explicit Euler (`s_{n+1} = s_n + v_n·dt`)
//! spirals outward on an undamped pendulum.

use serde::{Deserialize, Serialize};

use crate::config::IntegratorType;
use crate::error::{SimError, SimResult};

/// Physical constants of one run. Only constructible through validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PendulumConstants {
    g: f64,
    drag: f64,
    length: f64,
    mass: f64,
    dt: f64,
}

impl PendulumConstants {
    /// Validate and bundle the constants.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any value is non-finite, if `mass`,
    /// `length` or `dt` is not strictly positive, or if `drag` is negative.
    pub fn new(g: f64, drag: f64, length: f64, mass: f64, dt: f64) -> SimResult<Self> {
        for (name, value) in [
            ("gravity", g),
            ("drag", drag),
            ("length", length),
            ("mass", mass),
            ("dt", dt),
        ] {
            if !value.is_finite() {
                return Err(SimError::config(format!("{name} must be finite, got {value}")));
            }
        }
        if mass <= 0.0 {
            return Err(SimError::config(format!("mass must be positive, got {mass}")));
        }
        if length <= 0.0 {
            return Err(SimError::config(format!("length must be positive, got {length}")));
        }
        if dt <= 0.0 {
            return Err(SimError::config(format!("dt must be positive, got {dt}")));
        }
        if drag < 0.0 {
            return Err(SimError::config(format!("drag must not be negative, got {drag}")));
        }
        Ok(Self {
            g,
            drag,
            length,
            mass,
            dt,
        })
    }

    /// Gravitational acceleration (m/s²).
    #[must_use]
    pub const fn g(&self) -> f64 {
        self.g
    }

    /// Drag coefficient.
    #[must_use]
    pub const fn drag(&self) -> f64 {
        self.drag
    }

    /// String length (m).
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Bob mass (kg).
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Time step (s).
    #[must_use]
    pub const fn dt(&self) -> f64 {
        self.dt
    }
}

/// The integrated part of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseState {
    /// Time (s).
    pub t: f64,
    /// Angular position.
    pub s: f64,
    /// Angular velocity (rad/s).
    pub v: f64,
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// State one `dt` later.
    pub next: PhaseState,
    /// Acceleration evaluated at the starting state.
    pub acceleration: f64,
}

/// Angular acceleration at position `s` and velocity `v`.
///
/// Drag is quadratic in `v` and always opposes motion; the restoring term
/// uses `sin(s/L)`.
#[must_use]
pub fn acceleration(s: f64, v: f64, c: &PendulumConstants) -> f64 {
    -(c.drag / c.mass) * v * v.abs() - c.g * (s / c.length).sin()
}

/// Numerical integrator trait.
pub trait Integrator {
    /// Advance `state` by one `c.dt()`.
    fn step(&self, state: &PhaseState, c: &PendulumConstants) -> Step;

    /// Display name.
    fn name(&self) -> &'static str;

    /// Get the error order of this integrator.
    fn error_order(&self) -> u32;

    /// Check if integrator is symplectic (preserves phase space volume).
    fn is_symplectic(&self) -> bool;
}

/// Semi-implicit (symplectic) Euler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn step(&self, state: &PhaseState, c: &PendulumConstants) -> Step {
        let a = acceleration(state.s, state.v, c);
        let v = state.v + a * c.dt;
        // Position must see the already-updated velocity
        let s = state.s + v * c.dt;
        Step {
            next: PhaseState {
                t: state.t + c.dt,
                s,
                v,
            },
            acceleration: a,
        }
    }

    fn name(&self) -> &'static str {
        "semi-implicit Euler"
    }

    fn error_order(&self) -> u32 {
        1
    }

    fn is_symplectic(&self) -> bool {
        true
    }
}

/// Forward (explicit) Euler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn step(&self, state: &PhaseState, c: &PendulumConstants) -> Step {
        let a = acceleration(state.s, state.v, c);
        Step {
            next: PhaseState {
                t: state.t + c.dt,
                s: state.s + state.v * c.dt,
                v: state.v + a * c.dt,
            },
            acceleration: a,
        }
    }

    fn name(&self) -> &'static str {
        "explicit Euler"
    }

    fn error_order(&self) -> u32 {
        1
    }

    fn is_symplectic(&self) -> bool {
        false
    }
}

impl IntegratorType {
    /// Instantiate the selected integrator.
    #[must_use]
    pub fn build(self) -> Box<dyn Integrator + Send> {
        match self {
            Self::SemiImplicitEuler => Box::new(SemiImplicitEuler),
            Self::ExplicitEuler => Box::new(ExplicitEuler),
        }
    }
}
