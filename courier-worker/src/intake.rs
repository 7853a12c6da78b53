//! Job intake: decode, process and report each queue message in isolation.

use courier_callback::CallbackReporter;
use courier_mail::JobResult;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{error, info};

use crate::error::panic_message;
use crate::{BatchProcessor, Job, Result, WorkerError};

/// Summary of one received batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReceipt {
    /// Messages that ran through the pipeline.
    pub processed: usize,
    /// Messages dropped as malformed or failed.
    pub rejected: usize,
}

impl BatchReceipt {
    /// Total messages seen.
    pub fn total(&self) -> usize {
        self.processed + self.rejected
    }
}

/// Runs the pipeline for each queue message.
#[derive(Debug, Clone)]
pub struct JobIntake {
    processor: BatchProcessor,
    reporter: CallbackReporter,
}

impl JobIntake {
    /// Create an intake from its components.
    pub fn new(processor: BatchProcessor, reporter: CallbackReporter) -> Self {
        Self {
            processor,
            reporter,
        }
    }

    /// Handle one message body: decode, process every recipient, then report.
    pub async fn handle(&self, body: &str) -> Result<JobResult> {
        let job = Job::from_json(body)?;

        info!(
            job_id = %job.job_id,
            job_type = %job.job_type,
            recipients = job.recipients.len(),
            "Processing job"
        );

        let result = self.processor.process_job(&job).await;
        self.reporter.report(&job.job_id, &result).await;

        Ok(result)
    }

    /// Handle a batch of message bodies. A failure in one message never
    /// affects its siblings, and a panic inside the pipeline is contained.
    pub async fn handle_batch<I>(&self, bodies: I) -> BatchReceipt
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut receipt = BatchReceipt::default();

        for (index, body) in bodies.into_iter().enumerate() {
            let outcome = match body {
                Some(body) => AssertUnwindSafe(self.handle(&body))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| Err(WorkerError::Panic(panic_message(&*panic)))),
                None => Err(WorkerError::EmptyMessage),
            };

            match outcome {
                Ok(_) => receipt.processed += 1,
                Err(e) => {
                    error!(message_index = index, error = %e, "Error processing message");
                    receipt.rejected += 1;
                }
            }
        }

        info!(
            processed = receipt.processed,
            rejected = receipt.rejected,
            "Batch complete"
        );
        receipt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use courier_callback::CallbackConfig;
    use courier_mail::{Composer, Delivery, Dispatcher, Email, Transport};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Panics on `panic@x.com`, accepts everything else.
    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn send(&self, email: &Email) -> courier_mail::Result<Delivery> {
            if email.recipients()[0] == "panic@x.com" {
                panic!("transport exploded");
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Delivery::accepted(format!("m{n}")))
        }

        fn name(&self) -> &str {
            "SES"
        }
    }

    fn intake(transport: Arc<CountingTransport>) -> JobIntake {
        let processor = BatchProcessor::new(
            Arc::new(Composer::new().unwrap()),
            Dispatcher::new(transport),
            Some("noreply@example.com".into()),
        );
        let reporter = CallbackReporter::new(CallbackConfig::default()).unwrap();
        JobIntake::new(processor, reporter)
    }

    fn message(job_id: u32, email: &str) -> Option<String> {
        Some(format!(
            r#"{{"job_id": {job_id}, "type": "user_created", "recipients": [{{"email": "{email}", "recipient_data": "{{}}"}}]}}"#
        ))
    }

    #[tokio::test]
    async fn test_handle() {
        let transport = Arc::new(CountingTransport::default());
        let result = intake(transport)
            .handle(message(1, "ana@x.com").as_deref().unwrap())
            .await
            .unwrap();
        assert!(result.is_completed());
        assert_eq!(result.emails_sent, 1);
    }

    #[tokio::test]
    async fn test_malformed_message_does_not_block_siblings() {
        let transport = Arc::new(CountingTransport::default());
        let receipt = intake(transport.clone())
            .handle_batch(vec![
                Some("{not json".to_string()),
                None,
                message(2, "ana@x.com"),
            ])
            .await;

        assert_eq!(receipt, BatchReceipt { processed: 1, rejected: 2 });
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let transport = Arc::new(CountingTransport::default());
        let receipt = intake(transport.clone())
            .handle_batch(vec![message(1, "panic@x.com"), message(2, "ana@x.com")])
            .await;

        assert_eq!(receipt, BatchReceipt { processed: 2, rejected: 0 });
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_recipient_is_reported_as_failed() {
        let transport = Arc::new(CountingTransport::default());
        let result = intake(transport)
            .handle(message(1, "panic@x.com").as_deref().unwrap())
            .await
            .unwrap();

        assert_eq!(result.emails_failed, 1);
        assert_eq!(
            result.errors,
            vec!["panic@x.com: Unexpected error: transport exploded".to_string()]
        );
    }
}
