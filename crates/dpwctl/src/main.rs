//! dpwctl - Demand Planning Web terminal client
//!
//! Without a subcommand it starts the interactive TUI; subcommands are
//! one-shot and scriptable.

use anyhow::{Context, Result};
use clap::Parser;
use dpw_common::auth::EnvironmentIdentity;
use dpw_common::settings::DpwSettings;
use dpw_common::{AppContext, ToastQueue};
use dpwctl::cli::{Cli, Commands};
use dpwctl::commands::{self, AssignmentQuery};
use dpwctl::errors::{exit_code_for_any, EXIT_SUCCESS};
use dpwctl::logging;
use dpwctl::output::display_error;
use dpwctl::spinner::{LoadingSpinner, LOADING_CONFIGURATION};
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            display_error(&format!("{:#}", err));
            exit_code_for_any(&err)
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let mut settings = DpwSettings::load().context("Failed to load settings")?;
    if let Some(source) = cli.runtime_config {
        settings.runtime.source = source;
    }

    match cli.command {
        None | Some(Commands::Tui) => run_tui(settings).await,
        Some(Commands::Classify { message }) => commands::classify(&message),
        Some(command) => {
            logging::init_cli(&settings.logging.level);
            debug!(source = %settings.runtime.source, "Loading runtime config");
            let ctx = commands::load_context(settings).await?;
            dispatch(&ctx, command).await
        }
    }
}

async fn dispatch(ctx: &AppContext, command: Commands) -> Result<i32> {
    match command {
        Commands::Assignments {
            search,
            filters,
            sort,
            desc,
            page,
            page_size,
            json,
        } => {
            let query = AssignmentQuery {
                search,
                filters,
                sort,
                desc,
                page,
                page_size,
            };
            commands::assignments(ctx, query, json).await
        }
        Commands::Config { json } => commands::config(ctx, json).await,
        Commands::Whoami => commands::whoami(ctx).await,
        Commands::Log {
            message,
            level,
            category,
        } => commands::log(ctx, message, level, category).await,
        Commands::Tui | Commands::Classify { .. } => Ok(EXIT_SUCCESS),
    }
}

async fn run_tui(settings: DpwSettings) -> Result<i32> {
    let log_path = logging::init_tui(&settings.logging.level);
    if let Some(path) = &log_path {
        info!(path = %path.display(), "TUI logging to file");
    }

    let toasts = ToastQueue::new();
    let spinner = LoadingSpinner::start(LOADING_CONFIGURATION);
    let ctx = AppContext::bootstrap(
        settings,
        Arc::new(toasts.clone()),
        Arc::new(EnvironmentIdentity::from_env()),
    )
    .await
    .context("Could not initialize application")?;
    spinner.finish();

    if let Some(reason) = &ctx.loaded.fallback_reason {
        info!(reason = %reason, "Running on fallback runtime config");
    }

    dpwctl::tui::run(ctx, toasts).await?;
    Ok(EXIT_SUCCESS)
}
