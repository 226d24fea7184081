//! TUI state: routes, session, pages and global key handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dpw_common::auth::AuthSession;
use dpw_common::config::EnvironmentKind;
use dpw_common::item_assignment::ItemAssignment;
use dpw_common::notify::{Notifier, ToastQueue};
use dpw_common::profile::UserProfile;
use dpw_common::{AppContext, AsyncErrorScope};

use super::assignments_view::{AssignmentsView, ViewAction};
use super::dev_tools::{DevAction, DevToolsView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    ItemAssignments,
    ItemLocationOverride,
    PlanningMasterControl,
    DeveloperTools,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::ItemAssignments => "Item Assignments",
            Route::ItemLocationOverride => "Item Location Override",
            Route::PlanningMasterControl => "Planning Master Control",
            Route::DeveloperTools => "Developer Tools",
        }
    }

    /// Location reported with remote log events
    pub fn location(&self) -> &'static str {
        match self {
            Route::Home => "dpw://home",
            Route::ItemAssignments => "dpw://item-assignments",
            Route::ItemLocationOverride => "dpw://item-location-override",
            Route::PlanningMasterControl => "dpw://planning-master-control",
            Route::DeveloperTools => "dpw://developer-tools",
        }
    }

    /// Menu entries; Developer Tools only in development
    pub fn menu(development: bool) -> Vec<Route> {
        let mut routes = vec![
            Route::Home,
            Route::ItemAssignments,
            Route::ItemLocationOverride,
            Route::PlanningMasterControl,
        ];
        if development {
            routes.push(Route::DeveloperTools);
        }
        routes
    }
}

/// Side effects requested by a key press, carried out by the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Navigate(Route),
    LoadAssignments,
    RetryAssignments,
    Login,
    Logout,
    Dev(DevAction),
}

/// Results of background tasks
pub enum TuiMessage {
    /// Rows for the scope that requested them
    AssignmentsLoaded(AsyncErrorScope, Vec<ItemAssignment>),
    /// A load or retry ended; rows, if any, were sent before this
    AssignmentsSettled(AsyncErrorScope),
    ProfileLoaded(Option<UserProfile>),
    DevOperationFinished(AsyncErrorScope),
}

pub struct TuiState {
    pub route: Route,
    pub app_name: String,
    pub environment: String,
    pub environment_kind: EnvironmentKind,
    pub fallback_config: bool,
    pub session: AuthSession,
    pub profile: Option<UserProfile>,
    pub assignments: AssignmentsView,
    pub dev_tools: DevToolsView,
    pub toasts: ToastQueue,
    pub show_help: bool,
    page_size: usize,
    notifier: Notifier,
}

impl TuiState {
    pub fn new(ctx: &AppContext, toasts: ToastQueue) -> Self {
        let config = ctx.config();
        let notifier = ctx.notifier.clone();
        let page_size = ctx.settings.table.page_size;

        Self {
            route: Route::Home,
            app_name: config.app_name.clone(),
            environment: config.environment.clone(),
            environment_kind: config.environment_kind(),
            fallback_config: ctx.loaded.is_fallback(),
            session: ctx.identity.session(),
            profile: None,
            assignments: AssignmentsView::new(AsyncErrorScope::start(notifier.clone()), page_size),
            dev_tools: DevToolsView::new(AsyncErrorScope::start(notifier.clone())),
            toasts,
            show_help: false,
            page_size,
            notifier,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn menu(&self) -> Vec<Route> {
        Route::menu(self.environment_kind.is_development())
    }

    /// Name shown in the header
    pub fn user_label(&self) -> Option<String> {
        let account = self.session.account()?;
        Some(
            self.profile
                .as_ref()
                .map(|p| p.display_name.clone())
                .or_else(|| account.name.clone())
                .unwrap_or_else(|| "User".to_string()),
        )
    }

    pub fn role_label(&self) -> &str {
        match &self.profile {
            Some(profile) => crate::output::role_label(profile),
            None => "Supplier Manager",
        }
    }

    /// Switch pages. Leaving a page tears down its error scope; coming back
    /// starts it fresh.
    pub fn navigate(&mut self, route: Route) -> bool {
        if route == self.route || !self.menu().contains(&route) {
            return false;
        }
        self.unmount(self.route);
        self.route = route;
        true
    }

    fn unmount(&mut self, route: Route) {
        match route {
            Route::ItemAssignments => {
                self.assignments.scope.cancel();
                self.assignments =
                    AssignmentsView::new(AsyncErrorScope::start(self.notifier.clone()), self.page_size);
            }
            Route::DeveloperTools => {
                self.dev_tools.scope.cancel();
                self.dev_tools = DevToolsView::new(AsyncErrorScope::start(self.notifier.clone()));
            }
            _ => {}
        }
    }

    /// Cancel every live scope; called on exit
    pub fn shutdown(&self) {
        self.assignments.scope.cancel();
        self.dev_tools.scope.cancel();
    }

    pub fn sign_in(&mut self, session: AuthSession) {
        self.session = session;
        self.profile = None;
    }

    pub fn sign_out(&mut self) {
        self.unmount(self.route);
        self.session = AuthSession::Unauthenticated;
        self.profile = None;
        self.route = Route::Home;
    }

    /// Whether the assignments page needs its first fetch
    pub fn needs_assignments(&self) -> bool {
        self.route == Route::ItemAssignments && !self.assignments.loaded && !self.assignments.loading
    }

    fn relative_route(&self, step: isize) -> Route {
        let menu = self.menu();
        let len = menu.len() as isize;
        let current = menu.iter().position(|r| *r == self.route).unwrap_or(0) as isize;
        menu[((current + step).rem_euclid(len)) as usize]
    }

    fn page_is_editing(&self) -> bool {
        self.route == Route::ItemAssignments && self.assignments.is_editing()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        if self.page_is_editing() {
            return self.page_key(key);
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::F(1) | KeyCode::Char('?') => {
                self.show_help = true;
                return Action::None;
            }
            KeyCode::Char('x') => {
                self.toasts.dismiss_all();
                return Action::None;
            }
            _ => {}
        }

        if !self.is_authenticated() {
            return match key.code {
                KeyCode::Char('i') => Action::Login,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('o') => Action::Logout,
            KeyCode::Tab => Action::Navigate(self.relative_route(1)),
            KeyCode::BackTab => Action::Navigate(self.relative_route(-1)),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                match self.menu().get(index) {
                    Some(route) => Action::Navigate(*route),
                    None => Action::None,
                }
            }
            _ => self.page_key(key),
        }
    }

    fn page_key(&mut self, key: KeyEvent) -> Action {
        match self.route {
            Route::ItemAssignments => match self.assignments.handle_key(key) {
                ViewAction::None => Action::None,
                ViewAction::Reload => Action::LoadAssignments,
                ViewAction::Retry => Action::RetryAssignments,
                ViewAction::GoHome => Action::Navigate(Route::Home),
            },
            Route::DeveloperTools => match self.dev_tools.handle_key(key) {
                DevAction::None => Action::None,
                other => Action::Dev(other),
            },
            _ => Action::None,
        }
    }

    /// Apply a background result. Results from a torn-down scope are dropped.
    pub fn apply_message(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::AssignmentsLoaded(scope, rows) => {
                if scope.is_alive() {
                    self.assignments.set_rows(rows);
                }
            }
            TuiMessage::AssignmentsSettled(scope) => {
                if scope.is_alive() {
                    self.assignments.loading = false;
                }
            }
            TuiMessage::ProfileLoaded(profile) => {
                if self.is_authenticated() {
                    self.profile = profile;
                }
            }
            TuiMessage::DevOperationFinished(scope) => {
                if scope.is_alive() {
                    self.dev_tools.busy = false;
                }
            }
        }
    }
}
