//! Incremental decoding of `text/event-stream` bodies from chat completion
//! endpoints.
//!
//! Bytes arrive in arbitrary pieces, so the decoder buffers until it sees a
//! blank line, then hands back whole events. Only `data:` fields matter here.

use reqwest::Response;
use tokio::sync::mpsc::Sender;

use crate::consts::SSE_DONE;
use crate::errors::ProbeError;
use crate::models::response_stream::ChatCompletionChunk;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Data(String),
    Done,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Last byte seen was `\r`; a following `\n` belongs to the same line end.
    after_cr: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw bytes and returns every event completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        for &byte in bytes {
            match byte {
                b'\r' => {
                    self.buffer.push(b'\n');
                    self.after_cr = true;
                }
                b'\n' if self.after_cr => self.after_cr = false,
                _ => {
                    self.buffer.push(byte);
                    self.after_cr = false;
                }
            }
        }

        let mut events = vec![];
        while let Some(end) = find_blank_line(&self.buffer) {
            let raw: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(event) = parse_event(&raw[..end]) {
                events.push(event);
            }
        }
        events
    }

    /// Flushes a trailing event the server did not terminate with a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let raw = std::mem::take(&mut self.buffer);
        self.after_cr = false;
        parse_event(&raw)
    }
}

fn find_blank_line(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn parse_event(raw: &[u8]) -> Option<SseEvent> {
    let text = String::from_utf8_lossy(raw);
    let mut data: Vec<&str> = vec![];

    for line in text.lines() {
        if let Some(value) = line.strip_prefix("data:") {
            data.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }

    if data.is_empty() {
        return None;
    }

    let data = data.join("\n");
    if data.trim() == SSE_DONE {
        return Some(SseEvent::Done);
    }
    Some(SseEvent::Data(data))
}

/// Turns one `data:` payload into the text fragment it carries, if any.
pub fn fragment_from_data(data: &str) -> Result<Option<String>, ProbeError> {
    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| ProbeError::ParseError(format!("invalid stream chunk: {e}: {data}")))?;

    if let Some(message) = chunk.error_message() {
        return Err(ProbeError::ApiError(message));
    }

    Ok(chunk.content().map(str::to_string))
}

/// Reads `response` to the end, sending each text fragment through `sender`.
///
/// Stops at `[DONE]`, at the first error (which is forwarded), or when the
/// receiving side goes away.
pub(crate) async fn forward_fragments(
    mut response: Response,
    sender: Sender<Result<String, ProbeError>>,
) {
    let mut decoder = SseDecoder::new();

    loop {
        let bytes = match response.chunk().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => break,
            Err(e) => {
                log::warn!("stream read error: {e}");
                let _ = sender.send(Err(e.into())).await;
                return;
            }
        };

        for event in decoder.push(&bytes) {
            if !dispatch(event, &sender).await {
                return;
            }
        }
    }

    if let Some(event) = decoder.finish() {
        dispatch(event, &sender).await;
    }
}

async fn dispatch(event: SseEvent, sender: &Sender<Result<String, ProbeError>>) -> bool {
    let data = match event {
        SseEvent::Done => return false,
        SseEvent::Data(data) => data,
    };
    log::debug!("stream event: {data}");

    match fragment_from_data(&data) {
        Ok(Some(fragment)) => sender.send(Ok(fragment)).await.is_ok(),
        Ok(None) => true,
        Err(e) => {
            let _ = sender.send(Err(e)).await;
            false
        }
    }
}
