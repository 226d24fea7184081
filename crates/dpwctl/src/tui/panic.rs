//! Panic hook - last-resort error boundary for the TUI
//!
//! A panic inside the event loop would otherwise leave the terminal in raw
//! mode on the alternate screen. The hook puts the terminal back, reports the
//! panic locally and to the remote log sink, then hands off to the previous
//! hook so the usual panic output still appears.

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};
use dpw_common::remote_log::{LogLevel, LogPayload, RemoteLogger};
use serde_json::{Map, Value};
use std::any::Any;
use std::io;

pub const PANIC_LOG_CATEGORY: &str = "ErrorBoundary";

pub const PANIC_TITLE: &str = "Oops! Something went wrong";
pub const PANIC_SUBTITLE: &str =
    "We're sorry, but something unexpected happened. Our team has been notified.";

/// Install the hook. Call before entering raw mode.
pub fn install(remote: RemoteLogger) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();

        let message = panic_message(info.payload());
        let location = info.location().map(|l| l.to_string());
        tracing::error!(
            category = PANIC_LOG_CATEGORY,
            location = location.as_deref().unwrap_or(""),
            "TUI panicked: {}",
            message
        );
        remote.emit(panic_payload(&message, location.as_deref()));

        eprintln!("{}", PANIC_TITLE);
        eprintln!("{}", PANIC_SUBTITLE);
        previous(info);
    }));
}

/// Best effort; the terminal may already be restored.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Text of a panic payload. `panic!` yields `&str` or `String`.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

pub fn panic_payload(message: &str, location: Option<&str>) -> LogPayload {
    let mut data = Map::new();
    data.insert("errorType".into(), Value::String("Panic".into()));
    data.insert("errorMessage".into(), Value::String(message.to_string()));
    if let Some(location) = location {
        data.insert("location".into(), Value::String(location.to_string()));
    }
    data.insert(
        "timestamp".into(),
        Value::String(chrono::Utc::now().to_rfc3339()),
    );

    LogPayload {
        level: LogLevel::Error,
        message: format!("TUI panicked: {}", message),
        category: PANIC_LOG_CATEGORY.to_string(),
        data: Some(data),
    }
}
