//! Error types for the flappy crate

use thiserror::Error;

/// Main error type for the flappy crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(
        "no Q-value for action {action} in state {state}: the state space enumeration is incomplete or a state escaped its discretization bounds"
    )]
    UninitializedStateAction { action: String, state: String },

    #[error("no actions available to choose from")]
    EmptyActionSet,

    #[error("invalid hyperparameter {name}={value} (expected {expected})")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("invalid discretizer: {message}")]
    InvalidDiscretizer { message: String },

    #[error("unsupported session format version {found} (expected {expected})")]
    UnsupportedSessionVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
