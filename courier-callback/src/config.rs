//! Configuration for the callback reporter

use courier_config::{CallbackAuthMode, CallbackSettings};
use std::time::Duration;

/// Configuration for the callback reporter
#[derive(Clone)]
pub struct CallbackConfig {
    /// Callback endpoint; reporting is skipped when unset
    pub url: Option<String>,

    /// Credential sent with each callback
    pub token: Option<String>,

    /// Where the credential is placed
    pub auth_mode: CallbackAuthMode,

    /// Request timeout
    pub timeout: Duration,

    /// User-Agent header for outgoing requests
    pub user_agent: String,

    /// Maximum payload size in bytes
    pub max_payload_size: usize,
}

impl std::fmt::Debug for CallbackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("auth_mode", &self.auth_mode)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("max_payload_size", &self.max_payload_size)
            .finish()
    }
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            auth_mode: CallbackAuthMode::default(),
            timeout: Duration::from_secs(10),
            user_agent: format!("Courier-Callback/{}", env!("CARGO_PKG_VERSION")),
            max_payload_size: 1024 * 1024, // 1MB
        }
    }
}

impl CallbackConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> CallbackConfigBuilder {
        CallbackConfigBuilder::new()
    }

    /// Whether an endpoint is configured
    pub fn is_enabled(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

impl From<&CallbackSettings> for CallbackConfig {
    fn from(settings: &CallbackSettings) -> Self {
        Self {
            url: settings.url.clone(),
            token: settings.token.clone(),
            auth_mode: settings.auth_mode,
            timeout: settings.timeout,
            ..Self::default()
        }
    }
}

/// Builder for CallbackConfig
#[derive(Debug, Clone, Default)]
pub struct CallbackConfigBuilder {
    config: CallbackConfig,
}

impl CallbackConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: CallbackConfig::default(),
        }
    }

    /// Set the callback endpoint
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = Some(url.into());
        self
    }

    /// Set the credential
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Set the credential placement
    pub fn auth_mode(mut self, mode: CallbackAuthMode) -> Self {
        self.config.auth_mode = mode;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set maximum payload size
    pub fn max_payload_size(mut self, size: usize) -> Self {
        self.config.max_payload_size = size;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CallbackConfig {
        self.config
    }
}
