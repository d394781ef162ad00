use serde::Serialize;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use reqwest::header::{CONTENT_TYPE, HeaderValue};

use chat_probe::llm_client::LLMClient;

pub const TEST_API_KEY: &str = "test-key";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub fn base_url(mock_server: &MockServer) -> String {
    format!("{}/v1", mock_server.uri())
}

pub fn client_for(mock_server: &MockServer) -> LLMClient {
    LLMClient::new(reqwest::Client::new(), &base_url(mock_server), TEST_API_KEY)
}

pub fn sample_completion() -> Value {
    json!({
        "id": "chatcmpl-test-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gemini-2.5-flash",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "I am a large language model."},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 6, "completion_tokens": 7, "total_tokens": 13}
    })
}

pub fn sample_completion_zh() -> Value {
    json!({
        "id": "chatcmpl-test-2",
        "object": "chat.completion",
        "model": "gemini-2.5-flash",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "你好，我是一个语言模型。"},
            "finish_reason": "stop"
        }]
    })
}

pub fn content_chunk(content: &str) -> Value {
    json!({
        "id": "chatcmpl-stream-1",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": "gemini-2.5-pro",
        "choices": [{"index": 0, "delta": {"content": content}, "finish_reason": null}]
    })
}

pub fn role_chunk() -> Value {
    json!({
        "id": "chatcmpl-stream-1",
        "object": "chat.completion.chunk",
        "model": "gemini-2.5-pro",
        "choices": [{"index": 0, "delta": {"role": "assistant"}, "finish_reason": null}]
    })
}

pub fn stop_chunk() -> Value {
    json!({
        "id": "chatcmpl-stream-1",
        "object": "chat.completion.chunk",
        "model": "gemini-2.5-pro",
        "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]
    })
}

pub fn build_sse_stream<T: Serialize>(chunks: &[T]) -> String {
    let mut sse = String::new();
    for chunk in chunks {
        let json_str = serde_json::to_string(chunk).unwrap();
        sse.push_str(&format!("data: {}\n\n", json_str));
    }
    sse.push_str("data: [DONE]\n\n");
    sse
}

pub fn hello_sse() -> String {
    build_sse_stream(&[
        role_chunk(),
        content_chunk("Hel"),
        content_chunk("lo"),
        stop_chunk(),
    ])
}

pub async fn setup_chat_completion_mock(status: u16, body: impl Into<Value>) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body.into()))
        .mount(&mock_server)
        .await;

    mock_server
}

pub async fn setup_text_mock(status: u16, body: &str) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&mock_server)
        .await;

    mock_server
}

pub async fn setup_streaming_mock(sse: String) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(sse.into_bytes())
                .insert_header(CONTENT_TYPE, HeaderValue::from_static("text/event-stream")),
        )
        .mount(&mock_server)
        .await;

    mock_server
}

pub fn output_text(out: Vec<u8>) -> String {
    String::from_utf8(out).expect("output should be UTF-8")
}
