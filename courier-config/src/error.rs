// Error types for configuration loading

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse {key}: {reason}")]
    ParseError { key: String, reason: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    pub(crate) fn parse(key: &str, reason: impl ToString) -> Self {
        Self::ParseError {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
