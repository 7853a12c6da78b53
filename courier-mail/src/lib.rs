//! # Courier Mail
//!
//! Email composition, delivery transports and classified dispatch.
//!
//! ## Features
//!
//! - **Composer**: Built-in Handlebars notification templates with overrides
//! - **Transports**: AWS SES v2, a SendGrid-compatible HTTP API, and a log-only transport
//! - **Dispatcher**: One send per recipient, failures classified into readable messages
//! - **Outcomes**: Per-recipient outcomes aggregated into a job result
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier_mail::{Composer, Dispatcher, JobResult, LogTransport};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let composer = Composer::new()?;
//! let dispatcher = Dispatcher::new(Arc::new(LogTransport::new()));
//!
//! let content = composer.compose("user_created", &json!({"firstname": "Ana"}), None, None);
//! let outcome = dispatcher
//!     .dispatch("noreply@example.com", "ana@x.com", &content.subject, &content.html)
//!     .await;
//!
//! let result = JobResult::from_outcomes(vec![outcome]);
//! ```

mod address;
mod compose;
mod dispatch;
mod email;
mod error;
mod outcome;
mod transport;

#[cfg(feature = "http-api")]
mod http_api;

#[cfg(feature = "ses")]
mod ses;

pub use address::{Address, validate_email};
pub use compose::{Composed, Composer, GENERIC_HTML, GENERIC_SUBJECT, NotificationKind};
pub use dispatch::{DEFAULT_DISPATCH_TIMEOUT, Dispatcher, Failure, FailureKind, classify_failure};
pub use email::Email;
pub use error::{MailError, Result};
pub use outcome::{DeliveryStatus, DispatchOutcome, JobResult, JobStatus};
pub use transport::{Delivery, LogTransport, Transport};

#[cfg(feature = "http-api")]
pub use http_api::{HttpApiConfig, HttpApiTransport, MESSAGE_ID_HEADER};

#[cfg(feature = "ses")]
pub use ses::{SesConfig, SesTransport};

/// Prelude for common imports.
///
/// ```
/// use courier_mail::prelude::*;
/// ```
pub mod prelude {
    pub use crate::address::Address;
    pub use crate::compose::{Composed, Composer, NotificationKind};
    pub use crate::dispatch::Dispatcher;
    pub use crate::email::Email;
    pub use crate::error::{MailError, Result};
    pub use crate::outcome::{DispatchOutcome, JobResult, JobStatus};
    pub use crate::transport::{Delivery, LogTransport, Transport};

    #[cfg(feature = "http-api")]
    pub use crate::http_api::{HttpApiConfig, HttpApiTransport};

    #[cfg(feature = "ses")]
    pub use crate::ses::{SesConfig, SesTransport};
}
