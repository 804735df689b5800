//! Configuration system with YAML schema and validation.
//!
//! Implements Poka-Yoke (mistake-proofing) through:
//! - Type-safe configuration structs
//! - Schema validation via `validator`
//! - Runtime semantic validation
//!
//! Every check here runs before the first simulation step, so a bad mass or
//! time step is reported at startup instead of turning into NaN mid-run.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::engine::integrator::{acceleration, PendulumConstants, PhaseState};
use crate::engine::jidoka::JidokaConfig;
use crate::error::{SimError, SimResult};

/// Upper bound on ring capacity (five `f64` columns per slot).
pub const MAX_SAMPLES: usize = 10_000_000;

/// Reference configuration, used when no file is given.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../configs/pendulum.yaml");

/// Top-level simulation configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PendulumConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Physical parameters and initial condition.
    #[validate(nested)]
    #[serde(default)]
    pub pendulum: PendulumParams,

    /// Integration step and history length.
    #[validate(nested)]
    #[serde(default)]
    pub timestep: TimestepConfig,

    /// Display surface geometry and frame pacing.
    #[validate(nested)]
    #[serde(default)]
    pub display: DisplayConfig,

    /// Jidoka (stop-on-error) configuration.
    #[serde(default)]
    pub jidoka: JidokaConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl PendulumConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading pendulum configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> PendulumConfigBuilder {
        PendulumConfigBuilder::default()
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate_all(&self) -> SimResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> SimResult<()> {
        let p = &self.pendulum;
        for (name, value) in [
            ("pendulum.gravity", p.gravity),
            ("pendulum.drag", p.drag),
            ("pendulum.length", p.length),
            ("pendulum.mass", p.mass),
            ("pendulum.initial_angle_deg", p.initial_angle_deg),
            ("pendulum.initial_velocity", p.initial_velocity),
            ("timestep.dt", self.timestep.dt),
            ("timestep.total_time", self.timestep.total_time),
        ] {
            if !value.is_finite() {
                return Err(SimError::config(format!("{name} must be finite, got {value}")));
            }
        }

        // Constants carry their own invariants (mass != 0 etc.)
        let constants = self.constants()?;
        self.capacity()?;

        // Finite inputs can still overflow v·|v| on the very first frame
        let initial = self.initial_state();
        let a0 = acceleration(initial.s, initial.v, &constants);
        if !a0.is_finite() {
            return Err(SimError::config(format!(
                "initial state gives a non-finite acceleration ({a0}); \
                 reduce pendulum.initial_velocity or pendulum.drag"
            )));
        }

        let d = &self.display;
        if d.bob_radius >= d.width {
            return Err(SimError::config(format!(
                "display.bob_radius ({}) must be smaller than display.width ({})",
                d.bob_radius, d.width
            )));
        }

        Ok(())
    }

    /// Physical constants for the integrator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any constant is out of range.
    pub fn constants(&self) -> SimResult<PendulumConstants> {
        PendulumConstants::new(
            self.pendulum.gravity,
            self.pendulum.drag,
            self.pendulum.length,
            self.pendulum.mass,
            self.timestep.dt,
        )
    }

    /// Number of ring slots: `round(total_time / dt)`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if fewer than two or more than
    /// [`MAX_SAMPLES`] slots would be needed.
    pub fn capacity(&self) -> SimResult<usize> {
        let n = (self.timestep.total_time / self.timestep.dt).round();
        if !n.is_finite() || n < 2.0 {
            return Err(SimError::config(format!(
                "timestep.total_time / timestep.dt must give at least 2 samples, got {n}"
            )));
        }
        if n > MAX_SAMPLES as f64 {
            return Err(SimError::config(format!(
                "sample ring of {n} slots exceeds the limit of {MAX_SAMPLES}"
            )));
        }
        Ok(n as usize)
    }

    /// Initial phase state: `t = 0`, angle from degrees, initial velocity.
    #[must_use]
    pub fn initial_state(&self) -> PhaseState {
        PhaseState {
            t: 0.0,
            s: self.pendulum.initial_angle_deg.to_radians(),
            v: self.pendulum.initial_velocity,
        }
    }

}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            pendulum: PendulumParams::default(),
            timestep: TimestepConfig::default(),
            display: DisplayConfig::default(),
            jidoka: JidokaConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct PendulumConfigBuilder {
    gravity: Option<f64>,
    drag: Option<f64>,
    length: Option<f64>,
    mass: Option<f64>,
    initial_angle_deg: Option<f64>,
    initial_velocity: Option<f64>,
    dt: Option<f64>,
    total_time: Option<f64>,
    integrator: Option<IntegratorType>,
    exit: Option<ExitPolicy>,
}

impl PendulumConfigBuilder {
    /// Set gravitational acceleration (m/s²).
    #[must_use]
    pub const fn gravity(mut self, g: f64) -> Self {
        self.gravity = Some(g);
        self
    }

    /// Set the drag coefficient.
    #[must_use]
    pub const fn drag(mut self, drag: f64) -> Self {
        self.drag = Some(drag);
        self
    }

    /// Set string length (m).
    #[must_use]
    pub const fn length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    /// Set bob mass (kg).
    #[must_use]
    pub const fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Set the release angle in degrees.
    #[must_use]
    pub const fn initial_angle_deg(mut self, degrees: f64) -> Self {
        self.initial_angle_deg = Some(degrees);
        self
    }

    /// Set the initial angular velocity (rad/s).
    #[must_use]
    pub const fn initial_velocity(mut self, v: f64) -> Self {
        self.initial_velocity = Some(v);
        self
    }

    /// Set the timestep in seconds.
    #[must_use]
    pub const fn timestep(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    /// Set the simulated time covered by one pass of the sample ring.
    #[must_use]
    pub const fn total_time(mut self, seconds: f64) -> Self {
        self.total_time = Some(seconds);
        self
    }

    /// Set the integration scheme.
    #[must_use]
    pub const fn integrator(mut self, integrator: IntegratorType) -> Self {
        self.integrator = Some(integrator);
        self
    }

    /// Set the exit policy.
    #[must_use]
    pub const fn exit(mut self, exit: ExitPolicy) -> Self {
        self.exit = Some(exit);
        self
    }

    /// Build the configuration.
    ///
    /// The result is not validated; [`crate::engine::Simulation::new`] and
    /// [`PendulumConfig::validate_all`] do that.
    #[must_use]
    pub fn build(self) -> PendulumConfig {
        let mut config = PendulumConfig::default();
        let p = &mut config.pendulum;

        if let Some(g) = self.gravity {
            p.gravity = g;
        }
        if let Some(drag) = self.drag {
            p.drag = drag;
        }
        if let Some(length) = self.length {
            p.length = length;
        }
        if let Some(mass) = self.mass {
            p.mass = mass;
        }
        if let Some(angle) = self.initial_angle_deg {
            p.initial_angle_deg = angle;
        }
        if let Some(v) = self.initial_velocity {
            p.initial_velocity = v;
        }
        if let Some(dt) = self.dt {
            config.timestep.dt = dt;
        }
        if let Some(total) = self.total_time {
            config.timestep.total_time = total;
        }
        if let Some(integrator) = self.integrator {
            config.timestep.integrator = integrator;
        }
        if let Some(exit) = self.exit {
            config.display.exit = exit;
        }

        config
    }
}

/// Physical parameters of the pendulum and its release condition.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PendulumParams {
    /// Gravitational acceleration (m/s²).
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Lumped quadratic drag coefficient (unit-less).
    #[validate(range(min = 0.0))]
    #[serde(default = "default_drag")]
    pub drag: f64,
    /// String length (m).
    #[validate(range(exclusive_min = 0.0))]
    #[serde(default = "default_length")]
    pub length: f64,
    /// Bob mass (kg).
    #[validate(range(exclusive_min = 0.0))]
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Release angle in degrees.
    #[serde(default = "default_initial_angle_deg")]
    pub initial_angle_deg: f64,
    /// Initial angular velocity (rad/s).
    #[serde(default)]
    pub initial_velocity: f64,
}

const fn default_gravity() -> f64 {
    9.81
}

const fn default_drag() -> f64 {
    0.0018
}

const fn default_length() -> f64 {
    0.5
}

const fn default_mass() -> f64 {
    10_000.0
}

const fn default_initial_angle_deg() -> f64 {
    45.0
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            drag: default_drag(),
            length: default_length(),
            mass: default_mass(),
            initial_angle_deg: default_initial_angle_deg(),
            initial_velocity: 0.0,
        }
    }
}

/// Timestep configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TimestepConfig {
    /// Fixed timestep in seconds.
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    #[serde(default = "default_timestep")]
    pub dt: f64,
    /// Simulated seconds held by the sample ring before it wraps.
    #[validate(range(exclusive_min = 0.0))]
    #[serde(default = "default_total_time")]
    pub total_time: f64,
    /// Integration scheme.
    #[serde(default)]
    pub integrator: IntegratorType,
}

const fn default_timestep() -> f64 {
    0.01
}

const fn default_total_time() -> f64 {
    100.0
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            dt: default_timestep(),
            total_time: default_total_time(),
            integrator: IntegratorType::default(),
        }
    }
}

/// Integrator type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegratorType {
    /// Velocity first, then position from the new velocity.
    #[default]
    SemiImplicitEuler,
    /// Position from the old velocity (comparison only).
    ExplicitEuler,
}

/// Display surface configuration, in pixels.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Surface width.
    #[validate(range(min = 1))]
    #[serde(default = "default_extent")]
    pub width: u32,
    /// Surface height.
    #[validate(range(min = 1))]
    #[serde(default = "default_extent")]
    pub height: u32,
    /// Bob radius.
    #[serde(default = "default_bob_radius")]
    pub bob_radius: u32,
    /// Fixed pivot the rod is drawn from.
    #[serde(default = "default_anchor")]
    pub anchor: [i32; 2],
    /// Line height of the text readouts.
    #[validate(range(min = 1))]
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    /// Frame rate cap.
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// How the process leaves after a quit request.
    #[serde(default)]
    pub exit: ExitPolicy,
}

const fn default_extent() -> u32 {
    800
}

const fn default_bob_radius() -> u32 {
    10
}

const fn default_anchor() -> [i32; 2] {
    [400, 400]
}

const fn default_font_size() -> u32 {
    16
}

const fn default_target_fps() -> u32 {
    60
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_extent(),
            height: default_extent(),
            bob_radius: default_bob_radius(),
            anchor: default_anchor(),
            font_size: default_font_size(),
            target_fps: default_target_fps(),
            exit: ExitPolicy::default(),
        }
    }
}

/// Teardown path taken after a quit request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitPolicy {
    /// Restore the terminal, then terminate immediately without running
    /// destructors or further shutdown code.
    #[default]
    Hard,
    /// Restore the terminal and return from `main` normally.
    Graceful,
}
