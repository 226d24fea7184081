//! Remote log sink
//!
//! Ships client log events to `POST {API_BASE_URL}/logs`. Delivery is best
//! effort: failures are reported through `tracing` and never returned.

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Log levels understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!(
                "Invalid log level: '{}'. Valid values: debug, info, warn, error",
                other
            )),
        }
    }
}

/// A log event before the client adds its envelope fields
#[derive(Debug, Clone)]
pub struct LogPayload {
    pub level: LogLevel,
    pub message: String,
    pub category: String,
    pub data: Option<Map<String, Value>>,
}

/// Wire body of `POST /logs`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent<'a> {
    pub level: LogLevel,
    pub message: &'a str,
    pub category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a Map<String, Value>>,
    pub timestamp: String,
    pub url: String,
    pub user_agent: &'a str,
}

/// Sends log events to the backend
#[derive(Clone)]
pub struct RemoteLogger {
    http: reqwest::Client,
    endpoint: String,
    user_agent: String,
    session_id: String,
    /// Where in the client the event happened; the TUI updates this per route
    location: Arc<Mutex<String>>,
}

impl RemoteLogger {
    pub fn new(http: reqwest::Client, api_base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/logs", api_base_url.trim_end_matches('/')),
            user_agent: crate::http::user_agent(),
            session_id: uuid::Uuid::new_v4().to_string(),
            location: Arc::new(Mutex::new("dpw://home".to_string())),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn set_location(&self, location: impl Into<String>) {
        let mut guard = match self.location.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = location.into();
    }

    pub fn location(&self) -> String {
        match self.location.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Send one event and wait for the response. Never fails.
    pub async fn log(&self, payload: LogPayload) {
        let mut data = payload.data.unwrap_or_default();
        data.entry("sessionId")
            .or_insert_with(|| Value::String(self.session_id.clone()));

        let event = LogEvent {
            level: payload.level,
            message: &payload.message,
            category: &payload.category,
            data: Some(&data),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            url: self.location(),
            user_agent: &self.user_agent,
        };

        debug!(endpoint = %self.endpoint, category = %payload.category, "Sending log event");

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&event)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                debug!(status = %resp.status(), "Log event delivered");
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                warn!(%status, body = %body, "Log sink returned an error");
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Failed to send log to server");
            }
        }
    }

    /// Fire-and-forget variant of [`RemoteLogger::log`].
    ///
    /// Needs a tokio runtime; without one the event only reaches `tracing`.
    pub fn emit(&self, payload: LogPayload) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let logger = self.clone();
                handle.spawn(async move { logger.log(payload).await });
            }
            Err(_) => {
                debug!(message = %payload.message, "No runtime, remote log skipped");
            }
        }
    }

    pub fn info(&self, message: impl Into<String>, category: &str, data: Option<Map<String, Value>>) {
        self.emit_level(LogLevel::Info, message.into(), category, data);
    }

    pub fn warn(&self, message: impl Into<String>, category: &str, data: Option<Map<String, Value>>) {
        self.emit_level(LogLevel::Warn, message.into(), category, data);
    }

    pub fn error(&self, message: impl Into<String>, category: &str, data: Option<Map<String, Value>>) {
        self.emit_level(LogLevel::Error, message.into(), category, data);
    }

    fn emit_level(&self, level: LogLevel, message: String, category: &str, data: Option<Map<String, Value>>) {
        match level {
            LogLevel::Debug => debug!(category, "{}", message),
            LogLevel::Info => tracing::info!(category, "{}", message),
            LogLevel::Warn => warn!(category, "{}", message),
            LogLevel::Error => tracing::error!(category, "{}", message),
        }
        self.emit(LogPayload {
            level,
            message,
            category: category.to_string(),
            data,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let logger = RemoteLogger::new(reqwest::Client::new(), "https://api.example.com/api/");
        assert_eq!(logger.endpoint(), "https://api.example.com/api/logs");
    }

    #[test]
    fn test_event_wire_shape() {
        let event = LogEvent {
            level: LogLevel::Warn,
            message: "hello",
            category: "General",
            data: None,
            timestamp: "2024-01-01T00:00:00.000Z".into(),
            url: "dpw://home".into(),
            user_agent: "dpwctl/test",
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["level"], "warn");
        assert_eq!(json["userAgent"], "dpwctl/test");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_emit_without_runtime_does_not_panic() {
        let logger = RemoteLogger::new(reqwest::Client::new(), "http://127.0.0.1:9");
        logger.info("no runtime here", "General", None);
    }
}
