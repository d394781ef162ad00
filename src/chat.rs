use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use futures_core::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_stream::StreamExt;

use crate::errors::ProbeError;
use crate::llm_client::LLMClientTrait;
use crate::models::request::{self, Sampling};

const RESPONSE_FOOTER: &str = "--------------------------------------------------";

enum Turn {
    Continue,
    EndOfInput,
}

enum Step {
    Interrupted,
    Finished(Result<Turn, ProbeError>),
}

/// How an interactive session came to an end.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    Interrupted,
    EndOfInput,
    Failed(String),
}

/// Interactive streaming chat over `input`/`out`.
pub struct ChatSession<R, W> {
    client: Arc<dyn LLMClientTrait>,
    default_model: String,
    sampling: Sampling,
    input: R,
    out: W,
}

impl<R, W> ChatSession<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(client: Arc<dyn LLMClientTrait>, default_model: &str, input: R, out: W) -> Self {
        Self {
            client,
            default_model: default_model.to_string(),
            sampling: Sampling::default(),
            input,
            out,
        }
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Runs turns until `interrupt` resolves, input ends, or a turn fails.
    pub async fn run<F>(&mut self, interrupt: F) -> Result<SessionEnd, ProbeError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        writeln!(
            self.out,
            "Starting interactive chat session (press Ctrl+C to exit)."
        )?;

        loop {
            let step = tokio::select! {
                biased;
                _ = &mut interrupt => Step::Interrupted,
                turn = self.turn() => Step::Finished(turn),
            };

            match step {
                Step::Finished(Ok(Turn::Continue)) => continue,
                Step::Finished(Ok(Turn::EndOfInput)) => {
                    writeln!(self.out, "\nExiting chat session.")?;
                    self.out.flush()?;
                    return Ok(SessionEnd::EndOfInput);
                }
                Step::Interrupted => {
                    writeln!(self.out, "\nExiting chat session.")?;
                    self.out.flush()?;
                    return Ok(SessionEnd::Interrupted);
                }
                Step::Finished(Err(e)) => {
                    log::error!("chat turn failed: {e:?}");
                    writeln!(self.out, "\nAn error occurred: {e}")?;
                    self.out.flush()?;
                    return Ok(SessionEnd::Failed(e.to_string()));
                }
            }
        }
    }

    async fn turn(&mut self) -> Result<Turn, ProbeError> {
        let Some(question) = self.prompt("\nEnter your question: ").await? else {
            return Ok(Turn::EndOfInput);
        };
        if question.trim().is_empty() {
            writeln!(self.out, "Question cannot be empty.")?;
            return Ok(Turn::Continue);
        }

        let prompt = format!("Enter model ID (default: {}): ", self.default_model);
        let Some(model) = self.prompt(&prompt).await? else {
            return Ok(Turn::EndOfInput);
        };
        let model = if model.trim().is_empty() {
            self.default_model.clone()
        } else {
            model
        };

        writeln!(self.out, "\n--- Assistant's Response (Model: {model}) ---")?;
        self.out.flush()?;

        let request = request::ChatCompletionCreate::user_prompt(model, question)
            .with_sampling(&self.sampling)
            .streaming();
        let fragments = self.client.stream_chat_completion(&request).await?;
        write_fragments(fragments, &mut self.out).await?;

        writeln!(self.out, "\n{RESPONSE_FOOTER}")?;
        self.out.flush()?;
        Ok(Turn::Continue)
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>, ProbeError> {
        write!(self.out, "{text}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Writes each fragment as soon as it arrives and returns the full answer.
pub async fn write_fragments<S, W>(mut fragments: S, out: &mut W) -> Result<String, ProbeError>
where
    S: Stream<Item = Result<String, ProbeError>> + Unpin,
    W: Write,
{
    let mut answer = String::new();
    while let Some(fragment) = fragments.next().await {
        let fragment = fragment?;
        write!(out, "{fragment}")?;
        out.flush()?;
        answer.push_str(&fragment);
    }
    Ok(answer)
}
