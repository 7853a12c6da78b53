//! Worker error types.

use thiserror::Error;

/// Result type for worker operations.
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Worker errors.
///
/// None of these cross a recipient boundary; recipient failures are
/// recorded as outcomes instead.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Start-up configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] courier_config::ConfigError),

    /// Mail component could not be constructed.
    #[error("Mail error: {0}")]
    Mail(#[from] courier_mail::MailError),

    /// Callback component could not be constructed.
    #[error("Callback error: {0}")]
    Callback(#[from] courier_callback::CallbackError),

    /// A queue message could not be decoded into a job.
    #[error("Message decode error: {0}")]
    Decode(String),

    /// A queue message had no body.
    #[error("Message has no body")]
    EmptyMessage,

    /// I/O error while reading replay input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The pipeline panicked while handling a message.
    #[error("Panic while processing message: {0}")]
    Panic(String),
}

impl From<serde_json::Error> for WorkerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Text carried by a caught panic payload.
pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
