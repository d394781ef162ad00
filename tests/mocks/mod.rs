use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use chat_probe::config::{Config, ConfigLoader};
use chat_probe::errors::ProbeError;
use chat_probe::llm_client::{ChatOutcome, FragmentStream, LLMClientTrait};
use chat_probe::models::request;

/// Answers the first `failures` calls with HTTP 503 and every later call with 200.
pub struct ScriptedClient {
    failures: usize,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLMClientTrait for ScriptedClient {
    async fn request_chat_completion(
        &self,
        _request: &request::ChatCompletionCreate,
    ) -> Result<ChatOutcome, ProbeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if call < self.failures {
            Ok(ChatOutcome::Failure {
                status: 503,
                body: "overloaded".to_string(),
            })
        } else {
            Ok(ChatOutcome::Success(json!({"id": format!("chatcmpl-{call}")})))
        }
    }

    async fn stream_chat_completion(
        &self,
        _request: &request::ChatCompletionCreate,
    ) -> Result<FragmentStream, ProbeError> {
        Err(ProbeError::ApiError("streaming not scripted".to_string()))
    }
}

pub struct InMemoryConfigLoader {
    config: Config,
}

impl InMemoryConfigLoader {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self::new(Config {
            base_url,
            api_key: "test-key".to_string(),
            ..Config::default()
        })
    }
}

impl ConfigLoader for InMemoryConfigLoader {
    fn load_config(&self) -> Result<Config, ProbeError> {
        self.config.validate()?;
        Ok(self.config.clone())
    }
}
