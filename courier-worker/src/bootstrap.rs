//! Build the pipeline from a [`WorkerConfig`].

use courier_callback::{CallbackConfig, CallbackReporter};
use courier_config::{DeliverySettings, EmailProvider, WorkerConfig};
use courier_mail::{
    Composer, Dispatcher, HttpApiConfig, HttpApiTransport, LogTransport, SesConfig, SesTransport,
    Transport,
};
use std::sync::Arc;
use tracing::info;

use crate::{BatchProcessor, JobIntake, Result, WorkerError};

/// Construct the delivery transport selected by the settings.
pub async fn build_transport(settings: &DeliverySettings) -> Result<Arc<dyn Transport>> {
    let transport: Arc<dyn Transport> = match settings.provider {
        EmailProvider::Ses => {
            let mut config = SesConfig::new();
            if let Some(region) = &settings.ses_region {
                config = config.region(region.clone());
            }
            if let Some(set) = &settings.ses_configuration_set {
                config = config.configuration_set(set.clone());
            }
            Arc::new(SesTransport::new(config).await?)
        }
        EmailProvider::HttpApi => {
            let endpoint = settings.api_url.clone().ok_or_else(|| {
                WorkerError::Config(courier_config::ConfigError::KeyNotFound(
                    "SEND_EMAIL_API_URL".to_string(),
                ))
            })?;
            let mut config = HttpApiConfig::new(endpoint).timeout(settings.timeout);
            if let Some(key) = &settings.api_key {
                config = config.api_key(key.clone());
            }
            Arc::new(HttpApiTransport::new(config)?)
        }
        EmailProvider::Log => Arc::new(LogTransport::new()),
    };

    info!(provider = transport.name(), "Delivery transport ready");
    Ok(transport)
}

/// Build the intake with a given transport.
pub fn build_intake_with(config: &WorkerConfig, transport: Arc<dyn Transport>) -> Result<JobIntake> {
    let dispatcher = Dispatcher::new(transport).with_timeout(config.delivery.timeout);
    let processor = BatchProcessor::new(
        Arc::new(Composer::new()?),
        dispatcher,
        config.sender_email.clone(),
    )
    .with_concurrency(config.delivery.concurrency);

    let reporter = CallbackReporter::new(CallbackConfig::from(&config.callback))?;
    if !reporter.config().is_enabled() {
        info!("Callback URL not configured, results will only be logged");
    }

    Ok(JobIntake::new(processor, reporter))
}

/// Build the intake, constructing the configured transport.
pub async fn build_intake(config: &WorkerConfig) -> Result<JobIntake> {
    let transport = build_transport(&config.delivery).await?;
    build_intake_with(config, transport)
}
