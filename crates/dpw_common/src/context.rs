//! Application context
//!
//! Everything that used to be a process-wide singleton (config, HTTP client,
//! logger, services) is built here once and handed to the CLI and the TUI.

use crate::async_error::AsyncErrorScope;
use crate::auth::IdentityProvider;
use crate::config::{load_runtime_config, AppConfig, ConfigSource, LoadedConfig};
use crate::error::Result;
use crate::http;
use crate::item_assignment::ItemAssignmentService;
use crate::notify::{NotificationSink, Notifier};
use crate::profile::UserProfileService;
use crate::remote_log::RemoteLogger;
use crate::settings::DpwSettings;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub settings: DpwSettings,
    pub loaded: LoadedConfig,
    pub http: reqwest::Client,
    pub remote_log: RemoteLogger,
    pub notifier: Notifier,
    pub assignments: ItemAssignmentService,
    pub profiles: UserProfileService,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppContext {
    /// Load the runtime config (falling back on failure) and wire services.
    pub async fn bootstrap(
        settings: DpwSettings,
        sink: Arc<dyn NotificationSink>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self> {
        let bootstrap_http = http::bootstrap_client()?;
        let source = ConfigSource::parse(&settings.runtime.source);
        let loaded = load_runtime_config(source, &bootstrap_http).await;
        Self::from_loaded(settings, loaded, sink, identity)
    }

    /// Wire services around an already loaded config.
    pub fn from_loaded(
        settings: DpwSettings,
        loaded: LoadedConfig,
        sink: Arc<dyn NotificationSink>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self> {
        let http = http::build_client(&loaded.config)?;
        let base = loaded.config.api_base_url.clone();

        let remote_log = RemoteLogger::new(http.clone(), &base);
        let notifier = Notifier::new(sink, Some(remote_log.clone()));
        let assignments = ItemAssignmentService::new(http.clone(), &base);
        let profiles = UserProfileService::new(
            http.clone(),
            &settings.profile.graph_base,
            settings.auth.scopes.clone(),
        );

        Ok(Self {
            settings,
            loaded,
            http,
            remote_log,
            notifier,
            assignments,
            profiles,
            identity,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.loaded.config
    }

    /// A fresh, live error scope for one view or panel
    pub fn new_error_scope(&self) -> AsyncErrorScope {
        AsyncErrorScope::start(self.notifier.clone())
    }
}
