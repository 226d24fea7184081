//! Command implementations for the non-interactive CLI

mod assignments;
mod config;
mod diagnostics;
mod whoami;

pub use assignments::{assignments, AssignmentQuery};
pub use config::config;
pub use diagnostics::{classify, log};
pub use whoami::whoami;

use crate::console::ConsoleSink;
use crate::spinner::{LoadingSpinner, LOADING_CONFIGURATION};
use anyhow::{Context, Result};
use dpw_common::auth::EnvironmentIdentity;
use dpw_common::settings::DpwSettings;
use dpw_common::AppContext;
use std::sync::Arc;

/// Load the runtime config behind a spinner and wire the services.
pub async fn load_context(settings: DpwSettings) -> Result<AppContext> {
    let spinner = LoadingSpinner::start(LOADING_CONFIGURATION);
    let ctx = AppContext::bootstrap(
        settings,
        Arc::new(ConsoleSink),
        Arc::new(EnvironmentIdentity::from_env()),
    )
    .await
    .context("Could not initialize application")?;
    spinner.finish();
    Ok(ctx)
}
