//! Error types for polycal.

use thiserror::Error;

/// Errors that can occur in polycal operations.
#[derive(Error, Debug)]
pub enum PolycalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown transform type '{0}'")]
    UnknownTransform(String),

    #[error("Transform '{0}' is registered more than once")]
    DuplicateTransform(String),

    #[error("Invalid arguments for transform '{transform}': {message}")]
    InvalidKwarg { transform: String, message: String },

    #[error("Invalid duration {0:?}, expected <integer>[d|h|m]")]
    InvalidDuration(String),

    #[error("Unknown event field '{0}'")]
    UnknownField(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Event uid '{0}' produced by more than one source")]
    UidCollision(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PolycalError {
    pub(crate) fn kwarg(transform: &str, message: impl Into<String>) -> Self {
        PolycalError::InvalidKwarg {
            transform: transform.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for polycal operations.
pub type PolycalResult<T> = Result<T, PolycalError>;
