pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
pub const API_KEY_PLACEHOLDER: &str = "YOUR_OPENAI_COMPATIBLE_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_STREAM_MODEL: &str = "gemini-2.5-pro";
pub const HARNESS_PROMPT: &str = "Tell me a short story about a robot.";

pub const DEFAULT_CONCURRENCY: usize = 20;

pub const DEFAULT_CONFIG_FILE: &str = "./probe.json";

pub const CHANNEL_BUFFER_SIZE: usize = 100;

pub(crate) const EVENT_STREAM: &str = "text/event-stream";
pub(crate) const SSE_DONE: &str = "[DONE]";
