// Courier - queue-driven batch email dispatch
//
// Decodes notification jobs from a queue, composes and sends one email per
// recipient, and reports the aggregated result to an HTTP callback.

// Re-export component crates
pub use courier_callback as callback;
pub use courier_config as config;
pub use courier_mail as mail;

#[cfg(feature = "worker")]
pub use courier_worker as worker;

// Prelude for common imports
pub mod prelude {
    pub use courier_callback::{CallbackConfig, CallbackDelivery, CallbackReporter};
    pub use courier_config::{CallbackAuthMode, EmailProvider, WorkerConfig};
    pub use courier_mail::{
        Composer, Delivery, DeliveryStatus, DispatchOutcome, Dispatcher, Email, JobResult,
        JobStatus, LogTransport, MailError, Transport,
    };

    #[cfg(feature = "worker")]
    pub use courier_worker::{
        BatchProcessor, BatchReceipt, BatchResponse, Job, JobIntake, RecipientSpec, SqsWorker,
        build_intake,
    };
}
