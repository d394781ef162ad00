//! Concurrency probe: fire N identical chat requests at once and summarize.
//!
//! Every request runs in its own task. Results come back over a channel so
//! the per-request lines are written by one writer, in completion order,
//! while the returned results are ordered by launch index.

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::errors::ProbeError;
use crate::llm_client::LLMClientTrait;
use crate::models::request;

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// 1-based launch position.
    pub index: usize,
    pub success: bool,
    pub latency: Duration,
    pub status: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl Summary {
    /// A result missing from `results` counts as failed.
    pub fn from_results(total: usize, results: &[ProbeResult], elapsed: Duration) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total,
            successful,
            failed: total - successful,
            elapsed,
        }
    }

    pub fn requests_per_sec(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        (secs > 0.0).then(|| self.total as f64 / secs)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Test Summary ---")?;
        writeln!(f, "Total requests: {}", self.total)?;
        writeln!(f, "Successful:     {}", self.successful)?;
        writeln!(f, "Failed:         {}", self.failed)?;
        writeln!(f, "Total time:     {:.2}s", self.elapsed.as_secs_f64())?;
        if let Some(rps) = self.requests_per_sec() {
            writeln!(f, "Requests/sec:   {:.2}", rps)?;
        }
        write!(f, "--------------------")
    }
}

#[derive(Debug, Clone)]
pub struct HarnessReport {
    pub results: Vec<ProbeResult>,
    pub summary: Summary,
}

pub struct ConcurrencyHarness {
    client: Arc<dyn LLMClientTrait>,
    request: Arc<request::ChatCompletionCreate>,
    concurrency: usize,
}

impl ConcurrencyHarness {
    pub fn new(
        client: Arc<dyn LLMClientTrait>,
        request: request::ChatCompletionCreate,
        concurrency: usize,
    ) -> Self {
        Self {
            client,
            request: Arc::new(request),
            concurrency,
        }
    }

    pub async fn run<W: Write>(&self, out: &mut W) -> Result<HarnessReport, ProbeError> {
        writeln!(
            out,
            "Starting concurrency test with {} parallel requests...",
            self.concurrency
        )?;
        out.flush()?;

        let started = Instant::now();
        let (sender, mut receiver) = mpsc::channel(self.concurrency.max(1));

        for index in 1..=self.concurrency {
            let client = Arc::clone(&self.client);
            let request = Arc::clone(&self.request);
            let sender = sender.clone();
            tokio::spawn(async move {
                let report = send_one(client.as_ref(), &request, index).await;
                let _ = sender.send(report).await;
            });
        }
        drop(sender);

        let mut results = Vec::with_capacity(self.concurrency);
        while let Some((result, line)) = receiver.recv().await {
            writeln!(out, "{}", line)?;
            out.flush()?;
            results.push(result);
        }
        let elapsed = started.elapsed();

        if results.len() < self.concurrency {
            log::error!(
                "{} of {} requests did not report a result",
                self.concurrency - results.len(),
                self.concurrency
            );
        }

        results.sort_by_key(|r| r.index);
        let summary = Summary::from_results(self.concurrency, &results, elapsed);

        writeln!(out)?;
        writeln!(out, "{}", summary)?;
        out.flush()?;

        Ok(HarnessReport { results, summary })
    }
}

async fn send_one(
    client: &dyn LLMClientTrait,
    request: &request::ChatCompletionCreate,
    index: usize,
) -> (ProbeResult, String) {
    let started = Instant::now();
    let (success, status, latency, line) = match client.check_chat_completion(request).await {
        Ok(check) if check.is_ok() => {
            let secs = check.latency.as_secs_f64();
            (
                true,
                Some(check.status),
                check.latency,
                format!("Request {index:2}: Success (200) in {secs:.2}s"),
            )
        }
        Ok(check) => {
            let secs = check.latency.as_secs_f64();
            let status = check.status;
            let body = check.body.unwrap_or_default();
            (
                false,
                Some(status),
                check.latency,
                format!("Request {index:2}: Failed  ({status}) in {secs:.2}s - {body}"),
            )
        }
        Err(e) => {
            log::debug!("request {index} error: {e:?}");
            let latency = started.elapsed();
            let secs = latency.as_secs_f64();
            (
                false,
                None,
                latency,
                format!("Request {index:2}: Error in {secs:.2}s - {e}"),
            )
        }
    };

    let result = ProbeResult {
        index,
        success,
        latency,
        status,
    };
    (result, line)
}
