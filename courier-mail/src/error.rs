//! Mail error types.

use thiserror::Error;

/// Result type for mail operations.
pub type Result<T> = std::result::Result<T, MailError>;

/// Mail errors.
#[derive(Debug, Error)]
pub enum MailError {
    /// Invalid email address.
    #[error("Invalid email format: {0}")]
    InvalidAddress(String),

    /// Missing required field.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The provider refused the message.
    ///
    /// `code` is the provider's own error code (e.g. `MessageRejected`).
    #[error("{code}: {message}")]
    Rejected {
        /// Provider error code.
        code: String,
        /// Provider error message.
        message: String,
    },

    /// Template error.
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider API error that carries no error code.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Rate limited.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error.
    #[error("Delivery timed out")]
    Timeout,
}

impl MailError {
    /// Create a provider rejection.
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this error is retryable.
    ///
    /// The worker never retries on its own; this is surfaced in logs so the
    /// queue owner can judge whether a redelivery would help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout | Self::RateLimited(_))
    }
}

impl From<serde_json::Error> for MailError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<handlebars::RenderError> for MailError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for MailError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}

#[cfg(feature = "http-api")]
impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}
