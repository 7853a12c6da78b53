//! Per-recipient outcomes and the aggregated job result.

use serde::{Deserialize, Serialize};

/// Delivery status for one recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// The provider accepted the email.
    Sent,
    /// The email was not accepted.
    Failed,
}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Recipient address as given in the job.
    pub email: String,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// Provider message id, present only when sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Classified error message, present only when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    /// A sent outcome.
    pub fn sent(email: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            status: DeliveryStatus::Sent,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    /// A failed outcome.
    pub fn failed(email: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            status: DeliveryStatus::Failed,
            message_id: None,
            error: Some(error.into()),
        }
    }

    /// Whether the recipient was sent.
    pub fn is_sent(&self) -> bool {
        self.status == DeliveryStatus::Sent
    }
}

/// Final status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// No recipient failed.
    Completed,
    /// At least one recipient failed.
    PartialFailure,
}

/// Aggregated result of one job, derived from its outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    /// Job status.
    pub status: JobStatus,
    /// Number of sent outcomes.
    pub emails_sent: usize,
    /// Number of failed outcomes.
    pub emails_failed: usize,
    /// `"<email>: <error>"` for each failure, in recipient order.
    pub errors: Vec<String>,
    /// All outcomes, in recipient order.
    pub recipients: Vec<DispatchOutcome>,
}

impl JobResult {
    /// Build a result from outcomes.
    pub fn from_outcomes(recipients: Vec<DispatchOutcome>) -> Self {
        let emails_sent = recipients.iter().filter(|o| o.is_sent()).count();
        let emails_failed = recipients.len() - emails_sent;
        let errors = recipients
            .iter()
            .filter(|o| !o.is_sent())
            .map(|o| format!("{}: {}", o.email, o.error.as_deref().unwrap_or_default()))
            .collect();

        let status = if emails_failed == 0 {
            JobStatus::Completed
        } else {
            JobStatus::PartialFailure
        };

        Self {
            status,
            emails_sent,
            emails_failed,
            errors,
            recipients,
        }
    }

    /// Whether every recipient was sent.
    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }
}

impl FromIterator<DispatchOutcome> for JobResult {
    fn from_iter<I: IntoIterator<Item = DispatchOutcome>>(iter: I) -> Self {
        Self::from_outcomes(iter.into_iter().collect())
    }
}
