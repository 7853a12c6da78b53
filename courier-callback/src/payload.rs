//! Callback payload types

use courier_mail::JobResult;
use serde::Serialize;

/// The JSON document posted to the callback endpoint.
///
/// Job result fields are flattened next to `job_id`.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackPayload<'a> {
    /// Job identifier
    pub job_id: &'a str,

    /// Aggregated job result
    #[serde(flatten)]
    pub result: &'a JobResult,

    /// Credential, when placed in the body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<&'a str>,
}

impl<'a> CallbackPayload<'a> {
    /// Create a payload without a body credential
    pub fn new(job_id: &'a str, result: &'a JobResult) -> Self {
        Self {
            job_id,
            result,
            token: None,
        }
    }

    /// Attach the body credential
    pub fn with_token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    /// Convert to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// What happened to a callback, for logs and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackDelivery {
    /// No endpoint configured
    Skipped,
    /// The endpoint answered with a success status
    Delivered(u16),
    /// The endpoint answered with a non-success status
    Rejected(u16),
    /// The request could not be completed
    Failed(String),
}

impl CallbackDelivery {
    /// Whether the endpoint accepted the callback
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}
