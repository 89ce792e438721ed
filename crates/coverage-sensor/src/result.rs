//! Result and error types for the coverage sensor.

use thiserror::Error;

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Errors that can occur while recording or querying objectives
///
/// All of these signal a broken instrumentation contract rather than a
/// condition of the program under test. They are returned before any state
/// is mutated.
#[derive(Debug, Error)]
pub enum SensorError {
    /// Argument outside its valid domain (score, line, action index, id)
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Lookup of an objective that was never recorded
    #[error("Objective not found: {id}")]
    NotFound {
        /// Objective id that was looked up
        id: String,
    },

    /// Comparison kind or opcode not valid for the operand shape
    #[error("Unsupported comparison: {message}")]
    UnsupportedComparison {
        /// Error message
        message: String,
    },

    /// Invalid sensor configuration
    #[error("Invalid configuration: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl SensorError {
    /// Build an `InvalidArgument` error
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Build an `UnsupportedComparison` error
    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedComparison {
            message: message.into(),
        }
    }

    /// Build a `Config` error
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error comes from a violated call contract
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::UnsupportedComparison { .. }
        )
    }
}
