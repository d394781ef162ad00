use std::io::Write;

use crate::errors::ProbeError;
use crate::llm_client::{ChatOutcome, LLMClientTrait};
use crate::locale::Locale;
use crate::models::request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
    Success,
    HttpFailure(u16),
    Error,
}

/// Sends `request` once and reports the outcome to `out` in `locale`.
///
/// Transport and decoding failures are reported, not returned; the only
/// error surfaced to the caller is a failure to write the report itself.
pub async fn run_probe<W: Write>(
    client: &dyn LLMClientTrait,
    request: &request::ChatCompletionCreate,
    locale: Locale,
    out: &mut W,
) -> Result<ProbeVerdict, ProbeError> {
    let verdict = match client.request_chat_completion(request).await {
        Ok(ChatOutcome::Success(body)) => match locale.render_body(&body) {
            Ok(rendered) => {
                writeln!(out, "{}", locale.success())?;
                writeln!(out, "{}", locale.response_label())?;
                writeln!(out, "{}", rendered)?;
                ProbeVerdict::Success
            }
            Err(e) => {
                writeln!(out, "{}", locale.error_occurred(&e))?;
                ProbeVerdict::Error
            }
        },
        Ok(ChatOutcome::Failure { status, body }) => {
            log::warn!("probe failed with status {status}");
            writeln!(out, "{}", locale.failed_with_status(status))?;
            writeln!(out, "{}", locale.raw_response_label())?;
            writeln!(out, "{}", body)?;
            ProbeVerdict::HttpFailure(status)
        }
        Err(e) => {
            log::warn!("probe request error: {e}");
            writeln!(out, "{}", locale.error_occurred(&e))?;
            ProbeVerdict::Error
        }
    };

    out.flush()?;
    Ok(verdict)
}
