//! Error classifier
//!
//! Maps a raw [`Failure`] to an [`ErrorInfo`]: a category plus the message
//! shown to the user. Classification is a pure function driven by an ordered
//! rule table; the first rule whose marker appears in the error text wins.

use crate::error::Failure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Message used when nothing describes the failure.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Network,
    Auth,
    Permission,
    Server,
    /// Declared for completeness; no rule produces it yet.
    Validation,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Auth => "auth",
            ErrorKind::Permission => "permission",
            ErrorKind::Server => "server",
            ErrorKind::Validation => "validation",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub message: String,
    pub kind: ErrorKind,
    pub original_cause: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

/// One row of the classification table
#[derive(Debug, Clone, Copy)]
pub struct ClassifierRule {
    /// Any of these substrings selects the rule (case-sensitive)
    pub markers: &'static [&'static str],
    pub kind: ErrorKind,
    pub message: &'static str,
}

impl ClassifierRule {
    pub fn matches(&self, text: &str) -> bool {
        self.markers.iter().any(|marker| text.contains(marker))
    }
}

/// Ordered rules. Order is significant: a text carrying both `401` and `500`
/// is `Auth` because the `401` row comes first.
pub const RULES: &[ClassifierRule] = &[
    ClassifierRule {
        markers: &["fetch", "NetworkError"],
        kind: ErrorKind::Network,
        message: "Network error. Please check your connection and try again.",
    },
    ClassifierRule {
        markers: &["401"],
        kind: ErrorKind::Auth,
        message: "Authentication failed. Please refresh the page and log in again.",
    },
    ClassifierRule {
        markers: &["403"],
        kind: ErrorKind::Permission,
        message: "You do not have permission to access this data.",
    },
    ClassifierRule {
        markers: &["404"],
        kind: ErrorKind::Unknown,
        message: "The requested resource was not found.",
    },
    ClassifierRule {
        markers: &["500"],
        kind: ErrorKind::Server,
        message: "Server error. Please try again later.",
    },
    ClassifierRule {
        markers: &["CORS"],
        kind: ErrorKind::Network,
        message: "Connection issue. Please contact support.",
    },
];

/// Find the first rule matching `text`.
pub fn match_rule(text: &str) -> Option<&'static ClassifierRule> {
    RULES.iter().find(|rule| rule.matches(text))
}

/// Classify a raw failure.
pub fn classify(raw: &Failure) -> ErrorInfo {
    match raw {
        Failure::Error(err) => {
            let text = err.to_string();
            let (message, kind) = match match_rule(&text) {
                Some(rule) => (rule.message.to_string(), rule.kind),
                None => (text, ErrorKind::Unknown),
            };
            ErrorInfo {
                message,
                kind,
                original_cause: Some(Arc::clone(err)),
            }
        }
        Failure::Message(text) => ErrorInfo {
            message: text.clone(),
            kind: ErrorKind::Unknown,
            original_cause: None,
        },
        Failure::Unknown => ErrorInfo {
            message: GENERIC_ERROR_MESSAGE.to_string(),
            kind: ErrorKind::Unknown,
            original_cause: None,
        },
    }
}
