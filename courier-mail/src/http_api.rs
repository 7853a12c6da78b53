//! JSON mail API provider integration (SendGrid-compatible payload).

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::{Delivery, Email, MailError, Result, Transport};

/// Response header carrying the provider's message identifier.
pub const MESSAGE_ID_HEADER: &str = "x-message-id";

/// HTTP mail API configuration.
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
    /// API endpoint.
    pub endpoint: String,
    /// Bearer API key.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpApiConfig {
    /// Create a new configuration for an endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP mail API transport.
pub struct HttpApiTransport {
    client: Client,
    config: HttpApiConfig,
}

impl HttpApiTransport {
    /// Create a new HTTP API transport.
    pub fn new(config: HttpApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Transport for HttpApiTransport {
    async fn send(&self, email: &Email) -> Result<Delivery> {
        email.validate()?;

        let payload = ApiPayload::from_email(email);

        debug!(
            to = ?email.recipients(),
            subject = %email.subject,
            endpoint = %self.config.endpoint,
            "Sending email via HTTP API"
        );

        let mut request = self.client.post(&self.config.endpoint).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let message_id = response
                .headers()
                .get(MESSAGE_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            debug!(status = status.as_u16(), message_id = ?message_id, "Email accepted by HTTP API");

            Ok(Delivery {
                status_code: status.as_u16(),
                message_id,
            })
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            Err(MailError::RateLimited(retry_after))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MailError::rejected(format!("HTTP{}", status.as_u16()), body))
        }
    }

    fn name(&self) -> &str {
        "HTTP API"
    }
}

/// Mail API payload.
#[derive(Debug, Serialize)]
struct ApiPayload<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: EmailAddress<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<EmailAddress<'a>>,
}

#[derive(Debug, Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: &'a str,
}

impl<'a> ApiPayload<'a> {
    fn from_email(email: &'a Email) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: email
                    .to
                    .iter()
                    .map(|a| EmailAddress {
                        email: a.email(),
                        name: a.name(),
                    })
                    .collect(),
            }],
            from: EmailAddress {
                email: email.from.email(),
                name: email.from.name(),
            },
            subject: &email.subject,
            content: vec![Content {
                content_type: "text/html",
                value: &email.html,
            }],
        }
    }
}
