//! Notifications
//!
//! The side-effecting half of error handling: classify, show a transient
//! toast, and record the failure in the logs.

use crate::classifier::{classify, ErrorInfo};
use crate::error::Failure;
use crate::remote_log::{LogLevel, LogPayload, RemoteLogger};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{error, info};

pub const ERROR_TOAST_DURATION: Duration = Duration::from_secs(5);
pub const SUCCESS_TOAST_DURATION: Duration = Duration::from_secs(3);

/// Toasts kept at once; older ones are dropped first
const MAX_TOASTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
    pub duration: Duration,
}

/// Anything that can display a notification
pub trait NotificationSink: Send + Sync {
    fn push(&self, notification: Notification);
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.notification.duration
    }
}

/// In-memory toast stack rendered by the TUI
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired toasts and return the ones still visible, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<Toast> {
        let mut toasts = self.lock();
        toasts.retain(|t| !t.is_expired(now));
        toasts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn dismiss_all(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Toast>> {
        match self.toasts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl NotificationSink for ToastQueue {
    fn push(&self, notification: Notification) {
        let mut toasts = self.lock();
        if toasts.len() >= MAX_TOASTS {
            toasts.pop_front();
        }
        toasts.push_back(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }
}

/// Title shown on an error toast
pub fn error_title(context: Option<&str>) -> String {
    match context {
        Some(ctx) => format!("Error {}", ctx),
        None => "Error".to_string(),
    }
}

/// Classifies failures and fans them out to the toast sink and the logs
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    remote: Option<RemoteLogger>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, remote: Option<RemoteLogger>) -> Self {
        Self { sink, remote }
    }

    pub fn remote(&self) -> Option<&RemoteLogger> {
        self.remote.as_ref()
    }

    /// Classify `raw`, show it, log it, and hand back the classification.
    pub fn notify_error(&self, raw: &Failure, context: Option<&str>) -> ErrorInfo {
        let info = classify(raw);

        self.sink.push(Notification {
            level: NotificationLevel::Error,
            title: error_title(context),
            description: Some(info.message.clone()),
            duration: ERROR_TOAST_DURATION,
        });

        error!(
            context = context.unwrap_or(""),
            kind = %info.kind,
            cause = %raw,
            "{}",
            info.message
        );

        // Already traced above, so go straight to the sink.
        if let Some(remote) = &self.remote {
            remote.emit(async_error_payload(&info, raw, context));
        }

        info
    }

    pub fn notify_success(&self, message: &str, description: Option<&str>) {
        info!(description = description.unwrap_or(""), "{}", message);
        self.sink.push(Notification {
            level: NotificationLevel::Success,
            title: message.to_string(),
            description: description.map(str::to_string),
            duration: SUCCESS_TOAST_DURATION,
        });
    }
}

/// Remote event for a classified async failure
fn async_error_payload(info: &ErrorInfo, raw: &Failure, context: Option<&str>) -> LogPayload {
    let mut data = Map::new();
    data.insert("errorType".into(), Value::String(info.kind.as_str().to_string()));
    data.insert("originalError".into(), Value::String(raw.to_string()));
    if let Some(ctx) = context {
        data.insert("context".into(), Value::String(ctx.to_string()));
    }
    LogPayload {
        level: LogLevel::Error,
        message: info.message.clone(),
        category: "AsyncError".to_string(),
        data: Some(data),
    }
}
