//! Error types for the Demand Planning client.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DpwError {
    /// Transport-level failure. The text keeps the `NetworkError` / `fetch`
    /// markers the classifier keys on.
    #[error("NetworkError: failed to fetch {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("API call failed: {status}")]
    Http { status: reqwest::StatusCode },

    /// Undecodable body. The URL stays out of the text so port or path
    /// digits never reach the classifier.
    #[error("Invalid response: {reason}")]
    Decode { url: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DpwError {
    pub fn code(&self) -> i32 {
        match self {
            DpwError::Network { .. } => -32001,
            DpwError::Http { .. } => -32002,
            DpwError::Decode { .. } => -32003,
            DpwError::Config(_) => -32004,
            DpwError::Auth(_) => -32005,
            DpwError::Io(_) => -32006,
            DpwError::Json(_) => -32700,
            DpwError::Toml(_) => -32701,
        }
    }

    /// Wrap a reqwest send/receive error for `url`.
    pub fn network(url: &str, err: reqwest::Error) -> Self {
        DpwError::Network {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn decode(url: &str, err: impl fmt::Display) -> Self {
        DpwError::Decode {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DpwError>;

/// A raw failure as observed by a caller, before classification.
///
/// Mirrors "whatever was thrown": a real error value, a bare message, or
/// something with no usable description at all.
#[derive(Debug, Clone)]
pub enum Failure {
    Error(Arc<dyn std::error::Error + Send + Sync + 'static>),
    Message(String),
    Unknown,
}

impl Failure {
    pub fn from_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Failure::Error(Arc::new(err))
    }

    pub fn message(text: impl Into<String>) -> Self {
        Failure::Message(text.into())
    }
}

impl From<DpwError> for Failure {
    fn from(err: DpwError) -> Self {
        Failure::from_error(err)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        let boxed: Box<dyn std::error::Error + Send + Sync + 'static> = err.into();
        Failure::Error(Arc::from(boxed))
    }
}

impl From<&str> for Failure {
    fn from(text: &str) -> Self {
        Failure::Message(text.to_string())
    }
}

impl From<String> for Failure {
    fn from(text: String) -> Self {
        Failure::Message(text)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error(err) => write!(f, "{}", err),
            Failure::Message(text) => f.write_str(text),
            Failure::Unknown => f.write_str("unknown failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status_code_and_text() {
        let err = DpwError::Http {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(err.to_string(), "API call failed: 500 Internal Server Error");
    }

    #[test]
    fn test_network_error_keeps_markers() {
        let err = DpwError::Network {
            url: "http://x/y".into(),
            reason: "connection refused".into(),
        };
        let text = err.to_string();
        assert!(text.contains("NetworkError"));
        assert!(text.contains("fetch"));
    }

    #[test]
    fn test_failure_from_anyhow_keeps_message() {
        let failure = Failure::from(anyhow::anyhow!("boom 403"));
        assert_eq!(failure.to_string(), "boom 403");
        assert!(matches!(failure, Failure::Error(_)));
    }
}
