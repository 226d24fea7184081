//! Developer Tools page
//!
//! Simulated failures routed through an error scope, notification tests, a
//! log sink test event, and environment information. Only reachable in a
//! development environment.

use crossterm::event::{KeyCode, KeyEvent};
use dpw_common::notify::Notifier;
use dpw_common::remote_log::RemoteLogger;
use dpw_common::{AppContext, AsyncErrorScope};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::time::Instant;

/// A failure the page can trigger on demand
#[derive(Debug, PartialEq, Eq)]
pub struct SimulatedFailure {
    pub key: char,
    pub label: &'static str,
    pub message: &'static str,
    pub context: &'static str,
    pub delay: Duration,
}

pub const SIMULATED_FAILURES: &[SimulatedFailure] = &[
    SimulatedFailure {
        key: 'a',
        label: "Generic API Error",
        message: "Simulated API failure - testing async error handling",
        context: "testing async functionality",
        delay: Duration::from_millis(2000),
    },
    SimulatedFailure {
        key: 'n',
        label: "Network Error",
        message: "fetch failed - NetworkError when attempting to fetch",
        context: "testing network connectivity",
        delay: Duration::from_millis(1000),
    },
    SimulatedFailure {
        key: 'u',
        label: "Auth Error (401)",
        message: "API call failed: 401 Unauthorized",
        context: "testing authentication",
        delay: Duration::from_millis(1000),
    },
    SimulatedFailure {
        key: 'e',
        label: "Server Error (500)",
        message: "Server error: 500 Internal Server Error",
        context: "testing server connection",
        delay: Duration::from_millis(1000),
    },
];

/// (title, description, offset from the first one)
pub const MULTIPLE_NOTIFICATIONS: &[(&str, &str, Duration)] = &[
    ("Success 1", "First notification", Duration::from_millis(0)),
    ("Success 2", "Second notification", Duration::from_millis(500)),
    ("Success 3", "Third notification", Duration::from_millis(1000)),
];

pub const TEST_LOG_CATEGORY: &str = "DeveloperTools";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevAction {
    None,
    Simulate(&'static SimulatedFailure),
    ClearError,
    NotifySuccess,
    NotifyMany,
    SendTestLog,
}

pub struct DevToolsView {
    pub scope: AsyncErrorScope,
    /// A simulated operation is in flight
    pub busy: bool,
}

impl DevToolsView {
    pub fn new(scope: AsyncErrorScope) -> Self {
        Self { scope, busy: false }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DevAction {
        let KeyCode::Char(c) = key.code else {
            return DevAction::None;
        };

        if let Some(failure) = SIMULATED_FAILURES.iter().find(|f| f.key == c) {
            if self.busy {
                return DevAction::None;
            }
            self.busy = true;
            return DevAction::Simulate(failure);
        }

        match c {
            'c' => {
                self.scope.clear();
                DevAction::ClearError
            }
            's' => DevAction::NotifySuccess,
            'm' => DevAction::NotifyMany,
            'l' => DevAction::SendTestLog,
            _ => DevAction::None,
        }
    }
}

/// Wait out the simulated delay, then fail through `scope`.
pub async fn simulate(scope: &AsyncErrorScope, failure: &SimulatedFailure) {
    let delay = failure.delay;
    let message = failure.message;
    scope
        .run(failure.context, || async move {
            tokio::time::sleep(delay).await;
            Err::<(), _>(anyhow::anyhow!(message))
        })
        .await;
}

pub fn notify_success(notifier: &Notifier) {
    notifier.notify_success("Test Success", Some("This is a test success notification!"));
}

/// Three success toasts, half a second apart
pub async fn notify_many(notifier: &Notifier) {
    let start = Instant::now();
    for (title, description, offset) in MULTIPLE_NOTIFICATIONS {
        tokio::time::sleep_until(start + *offset).await;
        notifier.notify_success(title, Some(*description));
    }
}

pub fn send_test_log(remote: &RemoteLogger, environment: &str) {
    let mut data = Map::new();
    data.insert("environment".into(), Value::String(environment.to_string()));
    data.insert("sessionId".into(), Value::String(remote.session_id().to_string()));
    remote.info("Developer tools test event", TEST_LOG_CATEGORY, Some(data));
}

/// Key/value lines for the environment panel
pub fn environment_info(ctx: &AppContext, terminal: Rect) -> Vec<(&'static str, String)> {
    let config = ctx.config();
    vec![
        ("Environment", config.environment.clone()),
        ("App", config.app_name.clone()),
        ("API", config.api_base_url.clone()),
        ("Config source", ctx.loaded.source.to_string()),
        ("Client", dpw_common::http::user_agent()),
        ("Terminal", format!("{} x {}", terminal.width, terminal.height)),
        ("Session", ctx.remote_log.session_id().to_string()),
        (
            "Timestamp",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        ),
    ]
}

pub fn draw_dev_tools(f: &mut Frame, area: Rect, view: &DevToolsView, info: &[(&'static str, String)]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled("Developer Tools", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            "Development Environment Only",
            Style::default().fg(Color::Cyan),
        )),
    ]);
    f.render_widget(header, chunks[0]);

    let mut error_lines: Vec<Line> = SIMULATED_FAILURES
        .iter()
        .map(|failure| {
            Line::from(vec![
                Span::styled(format!("[{}] ", failure.key), Style::default().fg(Color::Red)),
                Span::raw(failure.label),
            ])
        })
        .collect();
    error_lines.push(Line::from(vec![
        Span::styled("[c] ", Style::default().fg(Color::Cyan)),
        Span::raw("Clear Error"),
    ]));
    if view.busy {
        error_lines.push(Line::from(Span::styled(
            "Running...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = view.scope.error() {
        error_lines.push(Line::from(Span::styled(
            format!("Current error: {}", error),
            Style::default().fg(Color::Red),
        )));
    }
    f.render_widget(
        Paragraph::new(error_lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Error Handling Tests "),
        ),
        chunks[1],
    );

    let notify_lines = vec![
        Line::from("[s] Test Success Notification   [m] Test Multiple Notifications"),
        Line::from(format!("[l] Send Test Log Event ({})", TEST_LOG_CATEGORY)),
    ];
    f.render_widget(
        Paragraph::new(notify_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Notification Testing "),
        ),
        chunks[2],
    );

    let info_lines: Vec<Line> = info
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", format!("{}:", label)), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(value.clone()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(info_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Environment Information "),
        ),
        chunks[3],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use dpw_common::classifier::ErrorKind;
    use dpw_common::notify::{NotificationLevel, ToastQueue};
    use dpw_common::{classify, Failure};
    use std::sync::Arc;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn view() -> (DevToolsView, ToastQueue) {
        let queue = ToastQueue::new();
        let notifier = Notifier::new(Arc::new(queue.clone()), None);
        (DevToolsView::new(AsyncErrorScope::start(notifier)), queue)
    }

    #[test]
    fn test_simulated_messages_classify() {
        let kinds: Vec<ErrorKind> = SIMULATED_FAILURES
            .iter()
            .map(|f| classify(&Failure::from(anyhow::anyhow!(f.message))).kind)
            .collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::Unknown, ErrorKind::Network, ErrorKind::Auth, ErrorKind::Server]
        );
    }

    #[test]
    fn test_busy_blocks_second_simulation() {
        let (mut view, _) = view();
        assert!(matches!(view.handle_key(key('n')), DevAction::Simulate(f) if f.key == 'n'));
        assert_eq!(view.handle_key(key('e')), DevAction::None);

        view.busy = false;
        assert!(matches!(view.handle_key(key('e')), DevAction::Simulate(_)));
    }

    #[test]
    fn test_other_keys() {
        let (mut view, _) = view();
        assert_eq!(view.handle_key(key('s')), DevAction::NotifySuccess);
        assert_eq!(view.handle_key(key('m')), DevAction::NotifyMany);
        assert_eq!(view.handle_key(key('l')), DevAction::SendTestLog);
        assert_eq!(view.handle_key(key('c')), DevAction::ClearError);
        assert_eq!(view.handle_key(key('q')), DevAction::None);
    }

    #[tokio::test]
    async fn test_simulate_sets_scope_error() {
        let (view, queue) = view();
        let quick = SimulatedFailure {
            key: 'x',
            label: "Quick",
            message: "API call failed: 401 Unauthorized",
            context: "testing authentication",
            delay: Duration::from_millis(5),
        };

        simulate(&view.scope, &quick).await;

        assert_eq!(
            view.scope.error().as_deref(),
            Some("Authentication failed. Please refresh the page and log in again.")
        );
        let toasts = queue.visible(std::time::Instant::now());
        assert_eq!(toasts[0].notification.title, "Error testing authentication");
    }

    #[tokio::test]
    async fn test_notify_many_in_order() {
        let queue = ToastQueue::new();
        let notifier = Notifier::new(Arc::new(queue.clone()), None);

        notify_many(&notifier).await;

        let titles: Vec<String> = queue
            .visible(std::time::Instant::now())
            .into_iter()
            .map(|t| t.notification.title)
            .collect();
        assert_eq!(titles, vec!["Success 1", "Success 2", "Success 3"]);
        assert!(queue
            .visible(std::time::Instant::now())
            .iter()
            .all(|t| t.notification.level == NotificationLevel::Success));
    }
}
