//! Logging setup for dpwctl
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to a
//! file instead:
//! 1. $DPW_LOG_FILE (explicit override)
//! 2. $XDG_STATE_HOME/dpw/dpwctl.log
//! 3. ~/.local/state/dpw/dpwctl.log
//!
//! `DPW_LOG` takes a `tracing` filter and wins over the configured level.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "DPW_LOG";
pub const LOG_FILE_ENV: &str = "DPW_LOG_FILE";

/// Discover the TUI log file path with the fallback chain above
pub fn discover_log_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        if !xdg_state.trim().is_empty() {
            return Some(Path::new(&xdg_state).join("dpw").join("dpwctl.log"));
        }
    }

    std::env::var("HOME")
        .ok()
        .map(|home| Path::new(&home).join(".local/state/dpw/dpwctl.log"))
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr. Safe to call more than once.
pub fn init_cli(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to the TUI log file. Returns the path in use, or `None` when no file
/// could be opened (logging is then off for the session).
pub fn init_tui(default_level: &str) -> Option<PathBuf> {
    let path = discover_log_path()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }

    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_configured_level() {
        let filter = env_filter("debug");
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_bad_level_falls_back() {
        // Unparseable directives degrade to "info" instead of failing startup
        let filter = env_filter("not a [valid filter");
        assert!(!filter.to_string().is_empty());
    }
}
