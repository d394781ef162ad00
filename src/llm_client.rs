use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::consts;
use crate::errors::ProbeError;
use crate::models::request;
use crate::sse;

/// Text fragments of one streamed answer, in delivery order.
pub type FragmentStream = ReceiverStream<Result<String, ProbeError>>;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Success(Value),
    Failure { status: u16, body: String },
}

/// Status of a non-streaming call, with the latency up to the response head.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCheck {
    pub status: u16,
    pub latency: Duration,
    /// Only read when `status` is not 200.
    pub body: Option<String>,
}

impl StatusCheck {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

#[async_trait]
pub trait LLMClientTrait: Send + Sync {
    /// Non-streaming call. Any status other than 200 is a `Failure`, not an error.
    async fn request_chat_completion(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<ChatOutcome, ProbeError>;

    /// Non-streaming call that only looks at the status; a 200 body is never parsed.
    async fn check_chat_completion(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<StatusCheck, ProbeError> {
        let started = Instant::now();
        let outcome = self.request_chat_completion(request).await?;
        let latency = started.elapsed();

        let check = match outcome {
            ChatOutcome::Success(_) => StatusCheck {
                status: StatusCode::OK.as_u16(),
                latency,
                body: None,
            },
            ChatOutcome::Failure { status, body } => StatusCheck {
                status,
                latency,
                body: Some(body),
            },
        };
        Ok(check)
    }

    /// Streaming call. Non-200 statuses and non-SSE bodies are errors.
    async fn stream_chat_completion(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<FragmentStream, ProbeError>;
}

#[derive(Clone)]
pub struct LLMClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LLMClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, consts::CHAT_COMPLETIONS_PATH)
    }

    async fn post(&self, request: &request::ChatCompletionCreate) -> Result<Response, ProbeError> {
        log::debug!("request: {:?}", request);

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        log::debug!("response status: {}", response.status());
        Ok(response)
    }
}

#[async_trait]
impl LLMClientTrait for LLMClient {
    async fn request_chat_completion(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<ChatOutcome, ProbeError> {
        let response = self.post(request).await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Ok(ChatOutcome::Failure {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: Value = serde_json::from_str(&text)?;
        Ok(ChatOutcome::Success(body))
    }

    async fn check_chat_completion(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<StatusCheck, ProbeError> {
        let started = Instant::now();
        let response = self.post(request).await?;
        let latency = started.elapsed();

        let status = response.status();
        let body = if status == StatusCode::OK {
            None
        } else {
            Some(response.text().await?)
        };

        Ok(StatusCheck {
            status: status.as_u16(),
            latency,
            body,
        })
    }

    async fn stream_chat_completion(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<FragmentStream, ProbeError> {
        let request = request.clone().streaming();
        let response = self.post(&request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = match response.headers().get(reqwest::header::CONTENT_TYPE) {
            Some(value) => value.to_str()?.to_string(),
            None => String::new(),
        };
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if !essence.eq_ignore_ascii_case(consts::EVENT_STREAM) {
            return Err(ProbeError::ParseError(format!(
                "content-type: {content_type}, expected: {}",
                consts::EVENT_STREAM
            )));
        }

        let (sender, receiver) = mpsc::channel(consts::CHANNEL_BUFFER_SIZE);
        tokio::spawn(sse::forward_fragments(response, sender));

        Ok(ReceiverStream::new(receiver))
    }
}
