use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::errors::ProbeError;
use crate::llm_client::{ChatOutcome, FragmentStream, LLMClientTrait};
use crate::models::request;

pub(crate) fn create_test_chat_request(
    model: &str,
    user_message: &str,
) -> request::ChatCompletionCreate {
    request::ChatCompletionCreate::user_prompt(model, user_message)
}

/// Client that answers every call from a fixed script and records requests.
pub(crate) struct StubClient {
    outcome: Result<ChatOutcome, ProbeError>,
    fragments: Vec<String>,
    calls: Mutex<Vec<request::ChatCompletionCreate>>,
}

impl StubClient {
    pub(crate) fn with_outcome(outcome: Result<ChatOutcome, ProbeError>) -> Self {
        Self {
            outcome,
            fragments: vec![],
            calls: Mutex::new(vec![]),
        }
    }

    pub(crate) fn ok(body: Value) -> Self {
        Self::with_outcome(Ok(ChatOutcome::Success(body)))
    }

    pub(crate) fn failing(status: u16, body: &str) -> Self {
        Self::with_outcome(Ok(ChatOutcome::Failure {
            status,
            body: body.to_string(),
        }))
    }

    pub(crate) fn streaming(fragments: &[&str]) -> Self {
        let mut client = Self::ok(Value::Null);
        client.fragments = fragments.iter().map(|f| f.to_string()).collect();
        client
    }

    pub(crate) fn last_request(&self) -> Option<request::ChatCompletionCreate> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMClientTrait for StubClient {
    async fn request_chat_completion(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<ChatOutcome, ProbeError> {
        self.calls.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }

    async fn stream_chat_completion(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<FragmentStream, ProbeError> {
        self.calls.lock().unwrap().push(request.clone());
        let (sender, receiver) = mpsc::channel(self.fragments.len().max(1));
        for fragment in &self.fragments {
            let _ = sender.send(Ok(fragment.clone())).await;
        }
        Ok(ReceiverStream::new(receiver))
    }
}
