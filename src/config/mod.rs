use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::errors::ProbeError;
use crate::locale::Locale;
use crate::models::request::{ChatCompletionCreate, Sampling};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    /// Name of an environment variable holding the key; wins over `api_key`.
    pub api_key_env: Option<String>,
    pub model: String,
    pub stream_model: String,
    pub prompt: Option<String>,
    pub concurrency: usize,
    pub locale: Locale,
    pub sampling: Sampling,
    /// Unset means no limit.
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: consts::DEFAULT_BASE_URL.to_string(),
            api_key: consts::API_KEY_PLACEHOLDER.to_string(),
            api_key_env: None,
            model: consts::DEFAULT_MODEL.to_string(),
            stream_model: consts::DEFAULT_STREAM_MODEL.to_string(),
            prompt: None,
            concurrency: consts::DEFAULT_CONCURRENCY,
            locale: Locale::En,
            sampling: Sampling::default(),
            connect_timeout_secs: None,
            read_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn probe_prompt(&self) -> &str {
        self.prompt
            .as_deref()
            .unwrap_or_else(|| self.locale.default_prompt())
    }

    pub fn harness_prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(consts::HARNESS_PROMPT)
    }

    /// Single user turn carrying the configured sampling parameters.
    pub fn chat_request(&self, model: &str, prompt: &str) -> ChatCompletionCreate {
        ChatCompletionCreate::user_prompt(model, prompt).with_sampling(&self.sampling)
    }

    /// Applies `PROBE_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ProbeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env_name) = &self.api_key_env {
            if let Some(key) = lookup(env_name.as_str()) {
                self.api_key = key;
            }
        }
        if let Some(base_url) = lookup("PROBE_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(api_key) = lookup("PROBE_API_KEY") {
            self.api_key = api_key;
        }
        if let Some(model) = lookup("PROBE_MODEL") {
            self.model = model;
        }
        if let Some(model) = lookup("PROBE_STREAM_MODEL") {
            self.stream_model = model;
        }
        if let Some(prompt) = lookup("PROBE_PROMPT") {
            self.prompt = Some(prompt);
        }
        if let Some(concurrency) = lookup("PROBE_CONCURRENCY") {
            self.concurrency = concurrency.trim().parse().map_err(|_| {
                ProbeError::ConfigError(format!("invalid PROBE_CONCURRENCY: {concurrency}"))
            })?;
        }
        if let Some(locale) = lookup("PROBE_LOCALE") {
            self.locale = locale.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.base_url.trim().is_empty() {
            return Err(ProbeError::ConfigError("base_url is empty".to_string()));
        }
        if self.concurrency == 0 {
            return Err(ProbeError::ConfigError(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub trait ConfigLoader: Send + Sync {
    fn load_config(&self) -> Result<Config, ProbeError>;
}

pub struct FileConfigLoader;

impl FileConfigLoader {
    pub fn new() -> Self {
        Self
    }

    fn read_file(path: &str, required: bool) -> Result<Config, ProbeError> {
        if !required && !Path::new(path).exists() {
            log::debug!("no config file at {path}, using defaults");
            return Ok(Config::default());
        }
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::ConfigError(format!("{path}: {e}")))?;
        let config: Config = serde_json::from_str(&config_str)
            .map_err(|e| ProbeError::ConfigError(format!("{path}: {e}")))?;
        Ok(config)
    }
}

impl Default for FileConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load_config(&self) -> Result<Config, ProbeError> {
        let mut config = match std::env::var("PROBE_CONFIG_FILE") {
            Ok(path) => Self::read_file(&path, true)?,
            Err(_) => Self::read_file(consts::DEFAULT_CONFIG_FILE, false)?,
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }
}

pub fn load_config() -> Result<Config, ProbeError> {
    let loader = FileConfigLoader::new();
    loader.load_config()
}
