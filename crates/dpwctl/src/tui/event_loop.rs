//! Event Loop - TUI entry point and action dispatch

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dpw_common::notify::ToastQueue;
use dpw_common::{AppContext, Failure};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::assignments_view::LOAD_CONTEXT;
use super::dev_tools::{self, DevAction};
use super::panic;
use super::render::draw_ui;
use super::state::{Action, Route, TuiState};

pub use super::state::TuiMessage;

const AUTH_LOG_CATEGORY: &str = "Authentication";

/// Run the TUI until the user quits
pub async fn run(ctx: AppContext, toasts: ToastQueue) -> Result<()> {
    panic::install(ctx.remote_log.clone());

    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = TuiState::new(&ctx, toasts);
    let (tx, mut rx) = mpsc::channel(32);

    let result = run_event_loop(&mut terminal, &ctx, &mut state, tx, &mut rx).await;

    state.shutdown();
    let cleanup_result = restore_terminal(&mut terminal);

    result.and(cleanup_result)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ctx: &AppContext,
    state: &mut TuiState,
    tx: mpsc::Sender<TuiMessage>,
    rx: &mut mpsc::Receiver<TuiMessage>,
) -> Result<()> {
    ctx.remote_log.set_location(state.route.location());
    if state.is_authenticated() {
        spawn_profile_fetch(ctx, &tx);
    }

    loop {
        while let Ok(msg) = rx.try_recv() {
            state.apply_message(msg);
        }

        let toasts = state.toasts.visible(Instant::now());
        let dev_info = if state.route == Route::DeveloperTools {
            dev_tools::environment_info(ctx, terminal.size()?)
        } else {
            Vec::new()
        };
        terminal.draw(|f| draw_ui(f, state, &toasts, &dev_info))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match state.handle_key(key) {
            Action::None => {}
            Action::Quit => break,
            Action::Navigate(route) => navigate(ctx, state, &tx, route),
            Action::LoadAssignments => load_assignments(ctx, state, &tx),
            Action::RetryAssignments => retry_assignments(ctx, state, &tx),
            Action::Login => login(ctx, state, &tx),
            Action::Logout => logout(ctx, state),
            Action::Dev(action) => dev_action(ctx, state, &tx, action),
        }
    }

    Ok(())
}

fn navigate(ctx: &AppContext, state: &mut TuiState, tx: &mpsc::Sender<TuiMessage>, route: Route) {
    if !state.navigate(route) {
        return;
    }
    debug!(route = route.location(), "Navigated");
    ctx.remote_log.set_location(route.location());

    if state.needs_assignments() {
        load_assignments(ctx, state, tx);
    }
}

fn load_assignments(ctx: &AppContext, state: &mut TuiState, tx: &mpsc::Sender<TuiMessage>) {
    state.assignments.loading = true;
    let scope = state.assignments.scope.clone();
    let service = ctx.assignments.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let msg = match scope.run(LOAD_CONTEXT, || service.fetch_all()).await {
            Some(rows) => TuiMessage::AssignmentsLoaded(scope, rows),
            None => TuiMessage::AssignmentsSettled(scope),
        };
        let _ = tx.send(msg).await;
    });
}

fn retry_assignments(ctx: &AppContext, state: &mut TuiState, tx: &mpsc::Sender<TuiMessage>) {
    state.assignments.loading = true;
    let scope = state.assignments.scope.clone();
    let service = ctx.assignments.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let loaded_tx = tx.clone();
        let loaded_scope = scope.clone();
        let outcome = scope
            .retry(|| async move {
                let rows = service.fetch_all().await?;
                let _ = loaded_tx
                    .send(TuiMessage::AssignmentsLoaded(loaded_scope, rows))
                    .await;
                Ok::<(), dpw_common::DpwError>(())
            })
            .await;
        debug!(?outcome, "Assignments retry finished");
        let _ = tx.send(TuiMessage::AssignmentsSettled(scope)).await;
    });
}

fn spawn_profile_fetch(ctx: &AppContext, tx: &mpsc::Sender<TuiMessage>) {
    let profiles = ctx.profiles.clone();
    let identity = ctx.identity.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let profile = profiles.fetch(identity.as_ref()).await;
        let _ = tx.send(TuiMessage::ProfileLoaded(profile)).await;
    });
}

fn login(ctx: &AppContext, state: &mut TuiState, tx: &mpsc::Sender<TuiMessage>) {
    ctx.remote_log.info("User initiated login process", AUTH_LOG_CATEGORY, None);

    match ctx.identity.login() {
        Ok(account) => {
            info!(username = %account.username, "Signed in from TUI");
            state.sign_in(ctx.identity.session());
            spawn_profile_fetch(ctx, tx);
        }
        Err(err) => {
            warn!(error = %err, "Sign-in failed");
            ctx.notifier.notify_error(&Failure::from(err), Some("signing in"));
        }
    }
}

fn logout(ctx: &AppContext, state: &mut TuiState) {
    ctx.remote_log.info("User initiated logout process", AUTH_LOG_CATEGORY, None);

    if let Err(err) = ctx.identity.logout() {
        warn!(error = %err, "Sign-out failed");
    }
    state.sign_out();
    ctx.remote_log.set_location(state.route.location());
}

fn dev_action(ctx: &AppContext, state: &mut TuiState, tx: &mpsc::Sender<TuiMessage>, action: DevAction) {
    match action {
        DevAction::None | DevAction::ClearError => {}
        DevAction::Simulate(failure) => {
            let scope = state.dev_tools.scope.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                dev_tools::simulate(&scope, failure).await;
                let _ = tx.send(TuiMessage::DevOperationFinished(scope)).await;
            });
        }
        DevAction::NotifySuccess => dev_tools::notify_success(state.notifier()),
        DevAction::NotifyMany => {
            let notifier = state.notifier().clone();
            tokio::spawn(async move { dev_tools::notify_many(&notifier).await });
        }
        DevAction::SendTestLog => dev_tools::send_test_log(&ctx.remote_log, &state.environment),
    }
}
