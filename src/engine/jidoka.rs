//! Jidoka (自働化) - Autonomous anomaly detection.
//!
//! Implements Toyota's Jidoka principle: machines that detect problems
//! and stop automatically to prevent defect propagation.
//!
//! # Checks
//!
//! 1. **Non-finite values**: NaN or Inf in the new sample or the acceleration
//!    stops the line with [`SimError::NonFiniteValue`].
//! 2. **Equilibrium**: acceleration and the new velocity both exactly `0.0`.
//!    Reported as a warning; the simulation keeps running.
//!
//! The guard runs after every step, so an ill-conditioned run is caught on
//! the first bad sample instead of being rendered.

use serde::{Deserialize, Serialize};

use crate::engine::ring::Advance;
use crate::error::{SimError, SimResult};

/// Warning from Jidoka check (non-critical issue).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JidokaWarning {
    /// The bob came to rest: zero acceleration and zero velocity.
    Equilibrium {
        /// Simulation time of the resting sample.
        time: f64,
    },
}

/// Jidoka guard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JidokaConfig {
    /// NaN/Inf detection enabled.
    #[serde(default = "default_true")]
    pub check_finite: bool,
    /// Emit the equilibrium diagnostic.
    #[serde(default = "default_true")]
    pub report_equilibrium: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for JidokaConfig {
    fn default() -> Self {
        Self {
            check_finite: true,
            report_equilibrium: true,
        }
    }
}

/// Exact-equality rest test. Floating point rarely lands on exactly zero,
/// so this is best effort.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_equilibrium(acceleration: f64, next_velocity: f64) -> bool {
    acceleration == 0.0 && next_velocity == 0.0
}

/// Jidoka guard for autonomous anomaly detection.
///
/// # Example
///
/// ```rust
/// use pendulum::engine::jidoka::{JidokaConfig, JidokaGuard};
/// use pendulum::engine::ring::{Advance, Sample};
///
/// let mut guard = JidokaGuard::new(JidokaConfig::default());
/// let advance = Advance {
///     cursor: 1,
///     previous: Sample::default(),
///     current: Sample::default(),
///     acceleration: 0.0,
///     wrapped: false,
/// };
///
/// let warnings = guard.check(&advance).unwrap_or_default();
/// assert_eq!(warnings.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct JidokaGuard {
    config: JidokaConfig,
    equilibrium_count: u64,
}

impl JidokaGuard {
    /// Create a new Jidoka guard with given configuration.
    #[must_use]
    pub const fn new(config: JidokaConfig) -> Self {
        Self {
            config,
            equilibrium_count: 0,
        }
    }

    /// Inspect one advance.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteValue` naming the first NaN/Inf field.
    pub fn check(&mut self, advance: &Advance) -> SimResult<Vec<JidokaWarning>> {
        if self.config.check_finite {
            Self::check_finite(advance)?;
        }

        let mut warnings = Vec::new();
        if self.config.report_equilibrium
            && is_equilibrium(advance.acceleration, advance.current.v)
        {
            self.equilibrium_count += 1;
            tracing::info!(time = advance.current.t, "pendulum reached equilibrium");
            warnings.push(JidokaWarning::Equilibrium {
                time: advance.current.t,
            });
        }

        Ok(warnings)
    }

    fn check_finite(advance: &Advance) -> SimResult<()> {
        let sample = &advance.current;
        let i = advance.cursor;
        for (field, value) in [
            ("t", sample.t),
            ("s", sample.s),
            ("v", sample.v),
            ("x", sample.x),
            ("y", sample.y),
        ] {
            if !value.is_finite() {
                tracing::warn!(slot = i, field, value, "non-finite sample, stopping the line");
                return Err(SimError::non_finite(format!("samples[{i}].{field}")));
            }
        }
        if !advance.acceleration.is_finite() {
            tracing::warn!(slot = i, value = advance.acceleration, "non-finite acceleration");
            return Err(SimError::non_finite("acceleration"));
        }
        Ok(())
    }

    /// Number of equilibrium diagnostics emitted so far.
    #[must_use]
    pub const fn equilibrium_count(&self) -> u64 {
        self.equilibrium_count
    }

    /// Reset counters.
    pub fn reset(&mut self) {
        self.equilibrium_count = 0;
    }

    /// Get current configuration.
    #[must_use]
    pub const fn config(&self) -> &JidokaConfig {
        &self.config
    }
}
