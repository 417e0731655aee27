//! Error types for the workout_core library.

use crate::lifecycle::{LifecycleCommand, WorkoutStatus};
use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed construction input or an out-of-range command argument
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// Lifecycle command issued from a status that does not allow it
    #[error("Cannot {attempted} a workout that is {from}")]
    StateTransition {
        from: WorkoutStatus,
        attempted: LifecycleCommand,
    },

    /// Content mutation attempted outside the `scheduled` status
    #[error("Cannot {operation} a workout that is {status}; only scheduled workouts can be modified")]
    Modification {
        status: WorkoutStatus,
        operation: &'static str,
    },

    /// No activity carries the requested order key
    #[error("No activity with order {order}")]
    ActivityNotFound { order: u32 },

    /// No stored document for the requested template
    #[error("Workout template not found: {0}")]
    TemplateNotFound(Uuid),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for the domain failures a caller is expected to recover from
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. }
                | Error::StateTransition { .. }
                | Error::Modification { .. }
                | Error::ActivityNotFound { .. }
        )
    }
}
