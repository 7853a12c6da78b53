//! Callback reporter for sending job results

use crate::{CallbackConfig, CallbackDelivery, CallbackError, CallbackPayload, Result};
use courier_mail::JobResult;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tracing::{debug, error, info, warn};

/// Header carrying the job identifier on every callback
pub const JOB_ID_HEADER: &str = "X-Courier-Job-Id";

/// Posts job results to the configured endpoint.
///
/// Reporting is best effort: failures are logged and never propagated.
#[derive(Debug, Clone)]
pub struct CallbackReporter {
    config: CallbackConfig,
    http_client: Client,
}

impl CallbackReporter {
    /// Create a new reporter
    pub fn new(config: CallbackConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| CallbackError::ConfigError(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Report a job result
    pub async fn report(&self, job_id: &str, result: &JobResult) -> CallbackDelivery {
        let Some(url) = self.config.url.as_deref().filter(|u| !u.is_empty()) else {
            info!(job_id = %job_id, "No callback URL configured, skipping callback");
            return CallbackDelivery::Skipped;
        };

        let delivery = match self.send(url, job_id, result).await {
            Ok(delivery) => delivery,
            Err(e) => CallbackDelivery::Failed(e.to_string()),
        };

        match &delivery {
            CallbackDelivery::Delivered(status) => {
                info!(job_id = %job_id, status = status, "Callback delivered");
            }
            CallbackDelivery::Rejected(status) => {
                warn!(job_id = %job_id, status = status, "Callback rejected by endpoint");
            }
            CallbackDelivery::Failed(reason) => {
                error!(job_id = %job_id, error = %reason, "Callback failed");
            }
            CallbackDelivery::Skipped => {}
        }

        delivery
    }

    async fn send(&self, url: &str, job_id: &str, result: &JobResult) -> Result<CallbackDelivery> {
        let token = self.config.token.as_deref().filter(|t| !t.is_empty());
        let auth_mode = self.config.auth_mode;

        let mut payload = CallbackPayload::new(job_id, result);
        if let Some(token) = token
            && auth_mode.uses_body()
        {
            payload = payload.with_token(token);
        }

        let body = payload.to_bytes()?;

        // Check payload size
        if body.len() > self.config.max_payload_size {
            return Err(CallbackError::PayloadTooLarge {
                size: body.len(),
                max: self.config.max_payload_size,
            });
        }

        let mut request = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json");

        match HeaderValue::from_str(job_id) {
            Ok(value) => request = request.header(JOB_ID_HEADER, value),
            Err(_) => debug!(job_id = ?job_id, "Job id is not a valid header value, omitting job id header"),
        }

        if let Some(token) = token
            && auth_mode.uses_header()
        {
            request = request.bearer_auth(token);
        }

        debug!(job_id = %job_id, url = %url, bytes = body.len(), "Sending callback");

        let response = request.body(body).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(CallbackDelivery::Delivered(status.as_u16()))
        } else {
            Ok(CallbackDelivery::Rejected(status.as_u16()))
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &CallbackConfig {
        &self.config
    }
}
