//! AWS SES email provider integration.

use async_trait::async_trait;
use aws_sdk_sesv2::{
    Client,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::{Body, Content, Destination, EmailContent, Message},
};
use tracing::debug;

use crate::{Delivery, Email, MailError, Result, Transport};

/// AWS SES configuration.
#[derive(Debug, Clone, Default)]
pub struct SesConfig {
    /// AWS region.
    pub region: Option<String>,
    /// Configuration set name (optional).
    pub configuration_set: Option<String>,
}

impl SesConfig {
    /// Create a new SES configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the configuration set.
    pub fn configuration_set(mut self, name: impl Into<String>) -> Self {
        self.configuration_set = Some(name.into());
        self
    }
}

/// AWS SES transport.
pub struct SesTransport {
    client: Client,
    config: SesConfig,
}

impl SesTransport {
    /// Create a new SES transport from the default AWS credential chain.
    pub async fn new(config: SesConfig) -> Result<Self> {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let ses_config = if let Some(region) = &config.region {
            aws_sdk_sesv2::config::Builder::from(&aws_config)
                .region(aws_sdk_sesv2::config::Region::new(region.clone()))
                .build()
        } else {
            aws_sdk_sesv2::config::Builder::from(&aws_config).build()
        };

        Ok(Self::from_client(Client::from_conf(ses_config), config))
    }

    /// Create from an existing AWS SDK client.
    pub fn from_client(client: Client, config: SesConfig) -> Self {
        Self { client, config }
    }
}

fn utf8(data: &str) -> Result<Content> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| MailError::Provider(e.to_string()))
}

/// Map an SDK failure onto the mail error taxonomy.
///
/// Service errors keep the SES error code so the dispatcher can tell a
/// bounce from a sender misconfiguration.
fn map_sdk_error<E, R>(err: SdkError<E, R>) -> MailError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::ServiceError(service) => {
            let inner = service.err();
            MailError::rejected(
                inner.code().unwrap_or("Unknown"),
                inner.message().unwrap_or_default(),
            )
        }
        SdkError::TimeoutError(_) => MailError::Timeout,
        SdkError::DispatchFailure(_) => {
            MailError::Network(DisplayErrorContext(&err).to_string())
        }
        _ => MailError::Provider(DisplayErrorContext(&err).to_string()),
    }
}

#[async_trait]
impl Transport for SesTransport {
    async fn send(&self, email: &Email) -> Result<Delivery> {
        email.validate()?;

        let to_addresses: Vec<String> = email.to.iter().map(|a| a.to_string()).collect();

        debug!(
            to = ?to_addresses,
            subject = %email.subject,
            "Sending email via AWS SES"
        );

        let mut destination = Destination::builder();
        for addr in &to_addresses {
            destination = destination.to_addresses(addr);
        }

        let message = Message::builder()
            .subject(utf8(&email.subject)?)
            .body(Body::builder().html(utf8(&email.html)?).build())
            .build();

        let mut request = self
            .client
            .send_email()
            .from_email_address(email.from.to_string())
            .destination(destination.build())
            .content(EmailContent::builder().simple(message).build());

        if let Some(config_set) = &self.config.configuration_set {
            request = request.configuration_set_name(config_set);
        }

        let output = request.send().await.map_err(map_sdk_error)?;

        debug!(message_id = ?output.message_id(), "Email accepted by AWS SES");

        // The SDK only yields an output for 2xx responses.
        Ok(Delivery {
            status_code: 200,
            message_id: output.message_id().map(str::to_string),
        })
    }

    fn name(&self) -> &str {
        "SES"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;
    use aws_sdk_sesv2::config::{
        BehaviorVersion, Credentials, Region, retry::RetryConfig, timeout::TimeoutConfig,
    };
    use aws_sdk_sesv2::operation::send_email::SendEmailError;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(endpoint: &str, operation_timeout: Option<Duration>) -> SesTransport {
        let mut builder = aws_sdk_sesv2::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .endpoint_url(endpoint)
            .retry_config(RetryConfig::disabled());
        if let Some(timeout) = operation_timeout {
            builder = builder
                .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build());
        }

        SesTransport::from_client(Client::from_conf(builder.build()), SesConfig::new())
    }

    fn email() -> Email {
        Email::new(
            Address::new("noreply@example.com").unwrap(),
            Address::new("ana@x.com").unwrap(),
            "Hello",
            "<p>Hello</p>",
        )
    }

    fn ses_error(code: &str, message: &str) -> ResponseTemplate {
        ResponseTemplate::new(400)
            .insert_header("x-amzn-ErrorType", code)
            .set_body_raw(format!(r#"{{"message":"{message}"}}"#), "application/json")
    }

    #[test]
    fn test_ses_config_builder() {
        let config = SesConfig::new()
            .region("eu-west-1")
            .configuration_set("transactional");

        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.configuration_set.as_deref(), Some("transactional"));
    }

    #[test]
    fn test_utf8_content() {
        let content = utf8("Licença atribuída").unwrap();
        assert_eq!(content.data(), "Licença atribuída");
        assert_eq!(content.charset(), Some("UTF-8"));
    }

    #[test]
    fn test_timeout_maps_to_timeout() {
        let err = SdkError::<SendEmailError, ()>::timeout_error("operation timed out");
        assert!(matches!(map_sdk_error(err), MailError::Timeout));
    }

    #[tokio::test]
    async fn test_accepted_message_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"MessageId":"ses-1"}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let delivery = transport(&server.uri(), None).send(&email()).await.unwrap();
        assert_eq!(delivery.message_id.as_deref(), Some("ses-1"));
        assert!(delivery.is_confirmed());
    }

    #[tokio::test]
    async fn test_message_rejected_keeps_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ses_error("MessageRejected", "Email address is not verified."))
            .mount(&server)
            .await;

        let err = transport(&server.uri(), None).send(&email()).await.unwrap_err();
        match &err {
            MailError::Rejected { code, message } => {
                assert_eq!(code, "MessageRejected");
                assert_eq!(message, "Email address is not verified.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            crate::classify_failure("SES", &err).kind,
            crate::FailureKind::Bounce
        );
    }

    #[tokio::test]
    async fn test_unverified_domain_is_configuration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ses_error("MailFromDomainNotVerifiedException", "example.com"))
            .mount(&server)
            .await;

        let err = transport(&server.uri(), None).send(&email()).await.unwrap_err();
        let failure = crate::classify_failure("SES", &err);
        assert_eq!(failure.kind, crate::FailureKind::Configuration);
        assert_eq!(
            failure.message,
            "Configuration: Sender domain not verified - example.com"
        );
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let err = transport(&server.uri(), Some(Duration::from_millis(200)))
            .send(&email())
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Timeout));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let err = transport("http://127.0.0.1:9", None)
            .send(&email())
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Network(_)), "got {err:?}");
    }
}
