//! Notification sink for one-shot commands: toasts become stderr lines.

use dpw_common::notify::{Notification, NotificationLevel, NotificationSink};
use owo_colors::OwoColorize;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

/// "[ERROR] Error loading item assignments: Server error. Please try again later."
pub fn format_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "[OK]",
        NotificationLevel::Error => "[ERROR]",
    };
    match &notification.description {
        Some(description) => format!("{} {}: {}", tag, notification.title, description),
        None => format!("{} {}", tag, notification.title),
    }
}

impl NotificationSink for ConsoleSink {
    fn push(&self, notification: Notification) {
        let line = format_notification(&notification);
        match notification.level {
            NotificationLevel::Success => eprintln!("{}", line.green()),
            NotificationLevel::Error => eprintln!("{}", line.red()),
        }
    }
}
