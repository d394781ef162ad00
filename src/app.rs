use std::sync::Arc;
use std::time::Duration;

use crate::config::{self, Config};
use crate::errors::ProbeError;
use crate::llm_client::LLMClient;

/// Common startup for the probe binaries: `.env`, logging and configuration.
pub fn init() -> Result<Config, ProbeError> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::load_config()?;
    log::info!(
        "Using endpoint {} (model {}, locale {})",
        config.base_url,
        config.model,
        config.locale
    );
    Ok(config)
}

pub fn build_http_client(config: &Config) -> Result<reqwest::Client, ProbeError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.read_timeout_secs {
        builder = builder.read_timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

pub fn create_client(config: &Config) -> Result<Arc<LLMClient>, ProbeError> {
    let http_client = build_http_client(config)?;
    Ok(Arc::new(LLMClient::new(
        http_client,
        &config.base_url,
        &config.api_key,
    )))
}
