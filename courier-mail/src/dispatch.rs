//! Single-recipient dispatch with classified failures.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{Address, DispatchOutcome, Email, MailError, Transport, validate_email};

/// Default bound on one delivery call.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure bucket for a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The recipient address was rejected before sending.
    Validation,
    /// The provider answered without confirming the message.
    NonSuccessStatus,
    /// The provider bounced the message.
    Bounce,
    /// The sending account is misconfigured.
    Configuration,
    /// Any other provider-reported error.
    Provider,
    /// Network, timeout or anything unexpected.
    Unexpected,
}

/// A classified dispatch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Failure bucket.
    pub kind: FailureKind,
    /// Message recorded on the outcome.
    pub message: String,
}

impl Failure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Classify a transport error for the named provider.
pub fn classify_failure(provider: &str, err: &MailError) -> Failure {
    match err {
        MailError::InvalidAddress(_) => Failure::new(FailureKind::Validation, err.to_string()),
        MailError::Rejected { code, message } => {
            let code = code.strip_suffix("Exception").unwrap_or(code);
            match code {
                "MessageRejected" => Failure::new(
                    FailureKind::Bounce,
                    format!("Bounce: Email rejected by {provider} - {message}"),
                ),
                "MailFromDomainNotVerified" => Failure::new(
                    FailureKind::Configuration,
                    format!("Configuration: Sender domain not verified - {message}"),
                ),
                "ConfigurationSetDoesNotExist" => Failure::new(
                    FailureKind::Configuration,
                    format!("Configuration: Invalid configuration set - {message}"),
                ),
                _ => Failure::new(
                    FailureKind::Provider,
                    format!("{provider} Error: {code} - {message}"),
                ),
            }
        }
        MailError::RateLimited(secs) => Failure::new(
            FailureKind::Provider,
            format!("{provider} Error: RateLimited - retry after {secs} seconds"),
        ),
        MailError::Provider(message) => Failure::new(
            FailureKind::Provider,
            format!("{provider} Error: Unknown - {message}"),
        ),
        other => Failure::new(FailureKind::Unexpected, format!("Unexpected error: {other}")),
    }
}

/// Sends one email per recipient and turns every result into an outcome.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("transport", &self.transport.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher over a transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name of the underlying provider.
    pub fn provider(&self) -> &str {
        self.transport.name()
    }

    /// Send one email. Never fails; every path yields an outcome.
    pub async fn dispatch(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        html: &str,
    ) -> DispatchOutcome {
        if let Err(e) = validate_email(recipient) {
            debug!(recipient = %recipient, "Recipient failed validation");
            return DispatchOutcome::failed(recipient, e.to_string());
        }

        let from = match Address::parse(sender) {
            Ok(from) => from,
            Err(_) => {
                return DispatchOutcome::failed(
                    recipient,
                    format!("Configuration: Invalid sender address: {sender}"),
                );
            }
        };
        let to = match Address::new(recipient) {
            Ok(to) => to,
            Err(e) => return DispatchOutcome::failed(recipient, e.to_string()),
        };

        let email = Email::new(from, to, subject, html);
        let provider = self.transport.name();

        let result = match tokio::time::timeout(self.timeout, self.transport.send(&email)).await {
            Ok(result) => result,
            Err(_) => Err(MailError::Timeout),
        };

        match result {
            Ok(delivery) if delivery.is_confirmed() => {
                let message_id = delivery.message_id.unwrap_or_default();
                debug!(recipient = %recipient, message_id = %message_id, provider = %provider, "Email sent");
                DispatchOutcome::sent(recipient, message_id)
            }
            Ok(delivery) => {
                warn!(
                    recipient = %recipient,
                    status = delivery.status_code,
                    message_id = ?delivery.message_id,
                    "Provider did not confirm the email"
                );
                DispatchOutcome::failed(
                    recipient,
                    format!("{provider} returned status {}", delivery.status_code),
                )
            }
            Err(e) => {
                let failure = classify_failure(provider, &e);
                warn!(
                    recipient = %recipient,
                    kind = ?failure.kind,
                    retryable = e.is_retryable(),
                    error = %failure.message,
                    "Email dispatch failed"
                );
                DispatchOutcome::failed(recipient, failure.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Delivery, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Respond = Box<dyn Fn(&Email) -> Result<Delivery> + Send + Sync>;

    struct MockTransport {
        respond: Respond,
        delay: Option<Duration>,
        sent: Mutex<Vec<Email>>,
    }

    impl MockTransport {
        fn new(respond: impl Fn(&Email) -> Result<Delivery> + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                respond: Box::new(respond),
                delay: None,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                respond: Box::new(|_| Ok(Delivery::accepted("late"))),
                delay: Some(delay),
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, email: &Email) -> Result<Delivery> {
            self.sent.lock().unwrap().push(email.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.respond)(email)
        }

        fn name(&self) -> &str {
            "SES"
        }
    }

    #[tokio::test]
    async fn test_sent() {
        let transport = MockTransport::new(|_| Ok(Delivery::accepted("m1")));
        let outcome = Dispatcher::new(transport.clone())
            .dispatch("noreply@example.com", "ana@x.com", "Hi", "<p>Hi</p>")
            .await;

        assert_eq!(outcome, DispatchOutcome::sent("ana@x.com", "m1"));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients(), vec!["ana@x.com"]);
        assert_eq!(sent[0].from.email(), "noreply@example.com");
        assert_eq!(sent[0].subject, "Hi");
    }

    #[tokio::test]
    async fn test_invalid_recipient_skips_transport() {
        let transport = MockTransport::new(|_| Ok(Delivery::accepted("m1")));
        let dispatcher = Dispatcher::new(transport.clone());

        let outcome = dispatcher.dispatch("noreply@example.com", "not-an-email", "Hi", "x").await;
        assert_eq!(
            outcome,
            DispatchOutcome::failed("not-an-email", "Invalid email format: not-an-email")
        );

        let outcome = dispatcher.dispatch("noreply@example.com", "", "Hi", "x").await;
        assert_eq!(outcome.error.as_deref(), Some("Invalid email format: "));

        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_sender() {
        let transport = MockTransport::new(|_| Ok(Delivery::accepted("m1")));
        let outcome = Dispatcher::new(transport)
            .dispatch("nobody", "ana@x.com", "Hi", "x")
            .await;
        assert_eq!(
            outcome.error.as_deref(),
            Some("Configuration: Invalid sender address: nobody")
        );
    }

    #[tokio::test]
    async fn test_unconfirmed_delivery() {
        let transport = MockTransport::new(|_| {
            Ok(Delivery {
                status_code: 500,
                message_id: Some("m1".into()),
            })
        });
        let outcome = Dispatcher::new(transport)
            .dispatch("noreply@example.com", "ana@x.com", "Hi", "x")
            .await;
        assert_eq!(outcome.error.as_deref(), Some("SES returned status 500"));

        let transport = MockTransport::new(|_| {
            Ok(Delivery {
                status_code: 200,
                message_id: None,
            })
        });
        let outcome = Dispatcher::new(transport)
            .dispatch("noreply@example.com", "ana@x.com", "Hi", "x")
            .await;
        assert_eq!(outcome.error.as_deref(), Some("SES returned status 200"));
    }

    #[tokio::test]
    async fn test_bounce() {
        let transport =
            MockTransport::new(|_| Err(MailError::rejected("MessageRejected", "Address blacklisted.")));
        let outcome = Dispatcher::new(transport)
            .dispatch("noreply@example.com", "ana@x.com", "Hi", "x")
            .await;
        assert_eq!(
            outcome.error.as_deref(),
            Some("Bounce: Email rejected by SES - Address blacklisted.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_unexpected() {
        let transport = MockTransport::slow(Duration::from_secs(60));
        let outcome = Dispatcher::new(transport)
            .with_timeout(Duration::from_secs(1))
            .dispatch("noreply@example.com", "ana@x.com", "Hi", "x")
            .await;
        assert_eq!(outcome.error.as_deref(), Some("Unexpected error: Delivery timed out"));
    }

    #[test]
    fn test_classify_configuration() {
        let failure = classify_failure(
            "SES",
            &MailError::rejected("MailFromDomainNotVerifiedException", "example.com"),
        );
        assert_eq!(failure.kind, FailureKind::Configuration);
        assert_eq!(failure.message, "Configuration: Sender domain not verified - example.com");

        let failure = classify_failure(
            "SES",
            &MailError::rejected("ConfigurationSetDoesNotExist", "missing-set"),
        );
        assert_eq!(failure.message, "Configuration: Invalid configuration set - missing-set");
    }

    #[test]
    fn test_classify_other_provider_codes() {
        let failure = classify_failure("SES", &MailError::rejected("Throttling", "slow down"));
        assert_eq!(failure.kind, FailureKind::Provider);
        assert_eq!(failure.message, "SES Error: Throttling - slow down");

        let failure = classify_failure("HTTP API", &MailError::RateLimited(5));
        assert_eq!(failure.kind, FailureKind::Provider);
        assert_eq!(failure.message, "HTTP API Error: RateLimited - retry after 5 seconds");
    }

    #[test]
    fn test_classify_unexpected() {
        let failure = classify_failure("SES", &MailError::Network("connection reset".into()));
        assert_eq!(failure.kind, FailureKind::Unexpected);
        assert_eq!(failure.message, "Unexpected error: Network error: connection reset");
    }
}
