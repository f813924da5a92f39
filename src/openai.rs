//! OpenAI-compatible client configuration with sensible defaults.

use crate::config::ModelSettings;
use crate::error::{CutlineError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for the configured endpoint.
///
/// The HTTP timeout comes from `model.timeout_secs` so a hung provider
/// cannot stall a request forever.
pub fn create_client(settings: &ModelSettings, api_key: &str) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(
        settings,
        api_key,
        Duration::from_secs(settings.timeout_secs),
    )
}

/// Create a client with a custom timeout.
pub fn create_client_with_timeout(
    settings: &ModelSettings,
    api_key: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CutlineError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let config = OpenAIConfig::new()
        .with_api_base(settings.base_url.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}
