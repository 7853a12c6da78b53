//! Batch processor: compose and dispatch every recipient of a job.

use courier_mail::{Composer, DispatchOutcome, Dispatcher, JobResult};
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::panic_message;
use crate::{Job, RecipientSpec};

/// Sender used when none is configured.
pub const FALLBACK_SENDER: &str = "noreply@example.com";

/// Turns a job's recipients into a [`JobResult`].
///
/// Recipients may be dispatched concurrently; outcomes always keep
/// recipient order.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    composer: Arc<Composer>,
    dispatcher: Dispatcher,
    sender: String,
    concurrency: usize,
}

impl BatchProcessor {
    /// Create a processor. A missing or blank sender falls back to
    /// [`FALLBACK_SENDER`].
    pub fn new(composer: Arc<Composer>, dispatcher: Dispatcher, sender: Option<String>) -> Self {
        let sender = match sender.filter(|s| !s.trim().is_empty()) {
            Some(sender) => sender,
            None => {
                warn!(
                    fallback = FALLBACK_SENDER,
                    "Sender email not configured, using fallback sender"
                );
                FALLBACK_SENDER.to_string()
            }
        };

        Self {
            composer,
            dispatcher,
            sender,
            concurrency: 1,
        }
    }

    /// Set how many recipients may be in flight at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Resolved sender address.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Process a decoded job.
    pub async fn process_job(&self, job: &Job) -> JobResult {
        self.process(
            &job.recipients,
            &job.job_type,
            job.custom_subject.as_deref(),
            job.custom_html.as_deref(),
        )
        .await
    }

    /// Process recipients for a job type with optional overrides.
    pub async fn process(
        &self,
        recipients: &[RecipientSpec],
        job_type: &str,
        override_subject: Option<&str>,
        override_body: Option<&str>,
    ) -> JobResult {
        let outcomes: Vec<DispatchOutcome> = stream::iter(recipients)
            .map(|recipient| self.process_recipient(recipient, job_type, override_subject, override_body))
            .buffered(self.concurrency)
            .collect()
            .await;

        let result = JobResult::from_outcomes(outcomes);
        info!(
            job_type = %job_type,
            status = ?result.status,
            sent = result.emails_sent,
            failed = result.emails_failed,
            "Processed recipients"
        );
        result
    }

    async fn process_recipient(
        &self,
        recipient: &RecipientSpec,
        job_type: &str,
        override_subject: Option<&str>,
        override_body: Option<&str>,
    ) -> DispatchOutcome {
        let data = match recipient.data() {
            Ok(data) => data,
            Err(reason) => {
                warn!(recipient = %recipient.email, reason = %reason, "Invalid recipient data");
                return DispatchOutcome::failed(
                    &recipient.email,
                    format!("Invalid recipient data: {reason}"),
                );
            }
        };

        let content = self
            .composer
            .compose(job_type, &data, override_subject, override_body);

        let dispatch =
            self.dispatcher
                .dispatch(&self.sender, &recipient.email, &content.subject, &content.html);

        match AssertUnwindSafe(dispatch).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = panic_message(&*panic);
                error!(recipient = %recipient.email, panic = %message, "Dispatch panicked");
                DispatchOutcome::failed(&recipient.email, format!("Unexpected error: {message}"))
            }
        }
    }
}
