// Typed worker configuration

use crate::{ConfigError, ConfigValidator, EnvLoader, Result, Validate};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Where the callback credential is placed on the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackAuthMode {
    /// `Authorization: Bearer <token>` header.
    #[default]
    Bearer,
    /// `token` field inside the JSON payload.
    Body,
    /// Both the header and the payload field.
    Both,
}

impl CallbackAuthMode {
    /// Whether the credential goes into the `Authorization` header.
    pub fn uses_header(&self) -> bool {
        matches!(self, Self::Bearer | Self::Both)
    }

    /// Whether the credential goes into the payload body.
    pub fn uses_body(&self) -> bool {
        matches!(self, Self::Body | Self::Both)
    }
}

impl FromStr for CallbackAuthMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bearer" | "header" => Ok(Self::Bearer),
            "body" | "token" => Ok(Self::Body),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown callback auth mode '{}'", other)),
        }
    }
}

/// Outbound email delivery provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailProvider {
    /// AWS SES v2.
    #[default]
    Ses,
    /// JSON mail API over HTTP (SendGrid-compatible payload).
    HttpApi,
    /// Log the email and accept it without sending.
    Log,
}

impl FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ses" | "aws" => Ok(Self::Ses),
            "http" | "http-api" | "sendgrid" => Ok(Self::HttpApi),
            "log" | "mock" => Ok(Self::Log),
            other => Err(format!("unknown email provider '{}'", other)),
        }
    }
}

/// Callback endpoint settings.
#[derive(Clone, Default)]
pub struct CallbackSettings {
    /// Endpoint URL; `None` disables the callback.
    pub url: Option<String>,
    /// Shared-secret credential forwarded with the callback.
    pub token: Option<String>,
    /// Credential placement.
    pub auth_mode: CallbackAuthMode,
    /// Request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for CallbackSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSettings")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("auth_mode", &self.auth_mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Email delivery settings.
#[derive(Clone, Default)]
pub struct DeliverySettings {
    /// Provider used for every dispatch.
    pub provider: EmailProvider,
    /// Per-dispatch timeout.
    pub timeout: Duration,
    /// Recipients dispatched concurrently within one job.
    pub concurrency: usize,
    /// SES region override.
    pub ses_region: Option<String>,
    /// SES configuration set.
    pub ses_configuration_set: Option<String>,
    /// HTTP mail API endpoint.
    pub api_url: Option<String>,
    /// HTTP mail API key.
    pub api_key: Option<String>,
}

impl fmt::Debug for DeliverySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliverySettings")
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .field("concurrency", &self.concurrency)
            .field("ses_region", &self.ses_region)
            .field("ses_configuration_set", &self.ses_configuration_set)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Complete worker configuration, populated once at start-up.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Default sender; the batch processor substitutes a placeholder when unset.
    pub sender_email: Option<String>,
    /// Callback settings.
    pub callback: CallbackSettings,
    /// Delivery settings.
    pub delivery: DeliverySettings,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl WorkerConfig {
    /// Default callback and delivery timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    /// Upper bound for `DISPATCH_CONCURRENCY`.
    pub const MAX_CONCURRENCY: usize = 64;
    /// Log level used when `LOG_LEVEL` is unset.
    pub const DEFAULT_LOG_LEVEL: &'static str = "info";

    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_loader(&EnvLoader::new())
    }

    /// Load from a custom lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self::from_loader(&EnvLoader::from_lookup(lookup))
    }

    /// Resolve `LOG_LEVEL` on its own, before the rest of the configuration
    /// is loaded.
    pub fn log_level_from(env: &EnvLoader) -> String {
        env.load_first(&["LOG_LEVEL"])
            .unwrap_or_else(|| Self::DEFAULT_LOG_LEVEL.to_string())
    }

    /// Load through an existing loader and validate.
    pub fn from_loader(env: &EnvLoader) -> Result<Self> {
        let callback = CallbackSettings {
            url: env.load_first(&["CALLBACK_URL", "MOODLE_CALLBACK_URL"]),
            token: env.load_first(&[
                "CALLBACK_TOKEN",
                "CALLBACK_AUTH",
                "MOODLE_CALLBACK_TOKEN",
                "MOODLE_TOKEN",
            ]),
            auth_mode: env.load_parsed("CALLBACK_AUTH_MODE", CallbackAuthMode::default())?,
            timeout: Duration::from_secs(
                env.load_parsed("CALLBACK_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?,
            ),
        };

        let delivery = DeliverySettings {
            provider: env.load_parsed("EMAIL_PROVIDER", EmailProvider::default())?,
            timeout: Duration::from_secs(
                env.load_parsed("DELIVERY_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?,
            ),
            concurrency: env.load_parsed("DISPATCH_CONCURRENCY", 1usize)?,
            ses_region: env.load_first(&["SES_REGION"]),
            ses_configuration_set: env.load_first(&["SES_CONFIGURATION_SET"]),
            api_url: env.load_first(&["SEND_EMAIL_API_URL"]),
            api_key: env.load_first(&["EMAIL_API_KEY"]),
        };

        let config = Self {
            sender_email: env.load_first(&["SENDER_EMAIL", "SES_SENDER_EMAIL"]),
            callback,
            delivery,
            log_level: Self::log_level_from(env),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            sender_email: None,
            callback: CallbackSettings {
                timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
                ..Default::default()
            },
            delivery: DeliverySettings {
                timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
                concurrency: 1,
                ..Default::default()
            },
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Validate for WorkerConfig {
    fn validate(&self) -> Result<()> {
        if let Some(sender) = &self.sender_email {
            ConfigValidator::is_email(sender, "SENDER_EMAIL")?;
        }
        if let Some(url) = &self.callback.url {
            ConfigValidator::is_url(url, "CALLBACK_URL")?;
        }

        ConfigValidator::in_range(self.callback.timeout.as_secs(), 1, 900, "CALLBACK_TIMEOUT_SECS")?;
        ConfigValidator::in_range(self.delivery.timeout.as_secs(), 1, 900, "DELIVERY_TIMEOUT_SECS")?;
        ConfigValidator::in_range(
            self.delivery.concurrency,
            1,
            Self::MAX_CONCURRENCY,
            "DISPATCH_CONCURRENCY",
        )?;

        if self.delivery.provider == EmailProvider::HttpApi {
            let url = self.delivery.api_url.as_deref().ok_or_else(|| {
                ConfigError::ValidationError(
                    "SEND_EMAIL_API_URL is required for the http email provider".to_string(),
                )
            })?;
            ConfigValidator::is_url(url, "SEND_EMAIL_API_URL")?;
        }

        Ok(())
    }
}
