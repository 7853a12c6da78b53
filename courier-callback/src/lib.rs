//! Job result callbacks for Courier
//!
//! Posts the aggregated result of each job to a configured HTTP endpoint.
//! Delivery is best effort: no retries, and failures never reach the caller.
//!
//! # Features
//!
//! - **Credential placement**: Bearer header, body `token` field, or both
//! - **Bounded requests**: Configurable timeout and maximum payload size
//! - **Observable outcome**: Every report yields a [`CallbackDelivery`]
//!
//! # Example
//!
//! ```rust,no_run
//! use courier_callback::{CallbackConfig, CallbackReporter};
//! use courier_mail::{DispatchOutcome, JobResult};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let reporter = CallbackReporter::new(
//!         CallbackConfig::builder()
//!             .url("https://lms.example.com/callback")
//!             .token("secret")
//!             .build(),
//!     )?;
//!
//!     let result = JobResult::from_outcomes(vec![DispatchOutcome::sent("ana@x.com", "m1")]);
//!     reporter.report("42", &result).await;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod payload;

pub use client::{CallbackReporter, JOB_ID_HEADER};
pub use config::{CallbackConfig, CallbackConfigBuilder};
pub use error::CallbackError;
pub use payload::{CallbackDelivery, CallbackPayload};

/// Result type for callback operations
pub type Result<T> = std::result::Result<T, CallbackError>;
