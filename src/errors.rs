use std::fmt;

#[derive(Debug, Clone)]
pub enum ProbeError {
    ApiError(String),
    HttpStatus { status: u16, body: String },
    ParseError(String),
    ConfigError(String),
    NetworkError(String),
    IoError(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::ApiError(msg) => write!(f, "API error: {}", msg),
            ProbeError::HttpStatus { status, body } => {
                write!(f, "HTTP status {}: {}", status, body)
            }
            ProbeError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ProbeError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            ProbeError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ProbeError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ProbeError {}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            ProbeError::NetworkError(err.to_string())
        } else {
            ProbeError::ApiError(err.to_string())
        }
    }
}

impl From<reqwest::header::ToStrError> for ProbeError {
    fn from(err: reqwest::header::ToStrError) -> Self {
        ProbeError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        ProbeError::IoError(err.to_string())
    }
}
