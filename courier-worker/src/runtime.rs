//! Lambda runtime for SQS-triggered jobs.

use aws_lambda_events::sqs::SqsEvent;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{BatchReceipt, JobIntake};

/// Body returned for every batch.
pub const SUCCESS_BODY: &str = "Job processed successfully";

/// Response returned to the Lambda runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    /// Always 200; individual failures are logged, not surfaced.
    pub status_code: u16,
    /// JSON-encoded message.
    pub body: String,
}

impl BatchResponse {
    /// The success receipt.
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: format!("\"{SUCCESS_BODY}\""),
        }
    }
}

impl From<BatchReceipt> for BatchResponse {
    fn from(_: BatchReceipt) -> Self {
        Self::success()
    }
}

/// Runs the job intake on the AWS Lambda runtime.
pub struct SqsWorker {
    intake: Arc<JobIntake>,
}

impl SqsWorker {
    /// Create a new worker.
    pub fn new(intake: JobIntake) -> Self {
        Self {
            intake: Arc::new(intake),
        }
    }

    /// Run the Lambda runtime.
    ///
    /// This function never returns under normal operation.
    pub async fn run(self) -> Result<(), Error> {
        info!("Starting Courier SQS worker");

        let intake = self.intake.clone();

        run(service_fn(move |event: LambdaEvent<SqsEvent>| {
            let intake = intake.clone();
            async move {
                debug!(request_id = %event.context.request_id, "Received SQS batch");
                Ok::<_, Error>(handle_event(&intake, event.payload).await)
            }
        }))
        .await
    }
}

/// Push every record of an SQS event through the intake.
pub async fn handle_event(intake: &JobIntake, event: SqsEvent) -> BatchResponse {
    debug!(records = event.records.len(), "Handling SQS event");

    let bodies = event.records.into_iter().map(|record| record.body);
    intake.handle_batch(bodies).await.into()
}
