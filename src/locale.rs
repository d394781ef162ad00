use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ProbeError;

/// Language of the single-request probe's console output.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn default_prompt(&self) -> &'static str {
        match self {
            Locale::En => "Hello, who are you?",
            Locale::Zh => "你好，请用中文介绍一下你自己。",
        }
    }

    pub fn success(&self) -> &'static str {
        match self {
            Locale::En => "Request successful!",
            Locale::Zh => "请求成功!",
        }
    }

    pub fn response_label(&self) -> &'static str {
        match self {
            Locale::En => "Response:",
            Locale::Zh => "响应内容:",
        }
    }

    pub fn raw_response_label(&self) -> &'static str {
        match self {
            Locale::En => "Response:",
            Locale::Zh => "响应原文:",
        }
    }

    pub fn failed_with_status(&self, status: u16) -> String {
        match self {
            Locale::En => format!("Request failed with status code: {status}"),
            Locale::Zh => format!("请求失败，状态码: {status}"),
        }
    }

    pub fn error_occurred(&self, error: &ProbeError) -> String {
        match self {
            Locale::En => format!("An error occurred: {error}"),
            Locale::Zh => format!("请求过程中发生错误: {error}"),
        }
    }

    /// `zh` output is indented; `serde_json` leaves non-ASCII unescaped either way.
    pub fn render_body(&self, body: &Value) -> Result<String, ProbeError> {
        let rendered = match self {
            Locale::En => serde_json::to_string(body)?,
            Locale::Zh => serde_json::to_string_pretty(body)?,
        };
        Ok(rendered)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Zh => write!(f, "zh"),
        }
    }
}

impl FromStr for Locale {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            other => Err(ProbeError::ConfigError(format!("unknown locale: {other}"))),
        }
    }
}
