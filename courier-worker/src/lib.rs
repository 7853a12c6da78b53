//! # Courier Worker
//!
//! Queue-driven batch email worker for AWS Lambda and SQS.
//!
//! Each SQS record carries one job. The worker decodes it, composes and
//! dispatches an email per recipient, aggregates the outcomes and reports
//! them to the callback endpoint. A failing message never affects its
//! siblings and the batch always reports success to the queue.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier_config::WorkerConfig;
//! use courier_worker::{SqsWorker, build_intake};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     let config = WorkerConfig::from_env()?;
//!     courier_worker::init_tracing(&config.log_level);
//!
//!     SqsWorker::new(build_intake(&config).await?).run().await
//! }
//! ```
//!
//! ## Deployment
//!
//! ```bash
//! cargo lambda build --release --bin courier-worker
//! cargo lambda deploy courier-worker
//! ```

mod bootstrap;
mod error;
mod intake;
mod job;
mod processor;
pub mod replay;
mod runtime;
mod telemetry;

pub use bootstrap::{build_intake, build_intake_with, build_transport};
pub use error::{Result, WorkerError};
pub use intake::{BatchReceipt, JobIntake};
pub use job::{Job, RecipientSpec};
pub use processor::{BatchProcessor, FALLBACK_SENDER};
pub use runtime::{BatchResponse, SUCCESS_BODY, SqsWorker, handle_event};
pub use telemetry::{init_local_tracing, init_tracing};

// Re-export lambda types
pub use aws_lambda_events;
pub use lambda_runtime;
