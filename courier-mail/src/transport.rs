//! Email transport abstraction.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::{Email, Result};

/// Provider acknowledgement for one accepted email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// HTTP status code reported by the provider.
    pub status_code: u16,
    /// Provider message identifier, if one was returned.
    pub message_id: Option<String>,
}

impl Delivery {
    /// An accepted delivery with status 200.
    pub fn accepted(message_id: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            message_id: Some(message_id.into()),
        }
    }

    /// Whether the provider both reported success and identified the message.
    pub fn is_confirmed(&self) -> bool {
        (200..300).contains(&self.status_code)
            && self.message_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Email delivery capability.
///
/// Implementations attempt exactly one send per call and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an email.
    async fn send(&self, email: &Email) -> Result<Delivery>;

    /// Provider name used in classified error messages.
    fn name(&self) -> &str;
}

/// Transport that logs emails instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

impl LogTransport {
    /// Create a new log transport.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for LogTransport {
    async fn send(&self, email: &Email) -> Result<Delivery> {
        email.validate()?;

        let message_id = format!("log-{}", Uuid::new_v4());
        info!(
            from = %email.from,
            to = ?email.recipients(),
            subject = %email.subject,
            message_id = %message_id,
            "Email accepted by log transport (not sent)"
        );

        Ok(Delivery::accepted(message_id))
    }

    fn name(&self) -> &str {
        "Log"
    }
}
