//! Error types for callback operations

use thiserror::Error;

/// Errors that can occur while building or sending a callback
#[derive(Error, Debug)]
pub enum CallbackError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Payload serialization failed
    #[error("Payload error: {0}")]
    PayloadError(String),

    /// Payload exceeds the configured maximum
    #[error("Payload too large: {size} bytes (max: {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for CallbackError {
    fn from(err: serde_json::Error) -> Self {
        CallbackError::PayloadError(err.to_string())
    }
}
