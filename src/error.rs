//! Error types for pendulum.
//!
//! All fallible operations return `Result<T, SimError>` instead of panicking.
//! Configuration problems surface before the first step; numerical faults
//! surface from the Jidoka guard on the step that produced them.

use thiserror::Error;

/// Result type alias for pendulum operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all pendulum operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Jidoka Violations =====
    /// Numerical instability detected (NaN or Inf).
    #[error("Jidoka: non-finite value detected at {location}")]
    NonFiniteValue {
        /// Location where the non-finite value was detected.
        location: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File or terminal I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Display surface could not be created or drawn to.
    #[error("Presentation error: {0}")]
    Presentation(String),
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a non-finite value error for the given location.
    #[must_use]
    pub fn non_finite(location: impl Into<String>) -> Self {
        Self::NonFiniteValue {
            location: location.into(),
        }
    }

    /// Create a presentation error.
    #[must_use]
    pub fn presentation(message: impl Into<String>) -> Self {
        Self::Presentation(message.into())
    }

    /// Check if this error is a Jidoka violation (requires immediate stop).
    #[must_use]
    pub const fn is_jidoka_violation(&self) -> bool {
        matches!(self, Self::NonFiniteValue { .. })
    }

    /// Check if this error was raised while validating configuration.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::YamlParse(_) | Self::Validation(_)
        )
    }
}
