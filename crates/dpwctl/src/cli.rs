//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use dpw_common::item_assignment::{is_table_column, TABLE_COLUMNS};
use dpw_common::remote_log::LogLevel;

/// Demand Planning Web terminal client
#[derive(Parser, Debug)]
#[command(name = "dpwctl")]
#[command(about = "Demand Planning Web - item assignment client", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Runtime config URL or path (overrides settings and $DPW_RUNTIME_CONFIG)
    #[arg(long, global = true)]
    pub runtime_config: Option<String>,

    /// Subcommand (if not provided, starts interactive TUI)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive terminal UI
    Tui,

    /// List item assignments
    Assignments {
        /// Match item name, item id or customer group (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Column filter, repeatable (e.g. customerGroup=RHCUST)
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// Sort by column
        #[arg(long, value_parser = parse_column)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (defaults to the configured table page size)
        #[arg(long)]
        page_size: Option<usize>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved runtime config and client settings
    Config {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show the signed-in account and directory profile
    Whoami,

    /// Classify an error message the way the UI would
    #[command(hide = true)]
    Classify {
        /// Error text to classify
        message: String,
    },

    /// Send a test event to the remote log sink
    #[command(hide = true)]
    Log {
        message: String,

        #[arg(long, default_value = "info", value_parser = parse_level)]
        level: LogLevel,

        #[arg(long, default_value = "DeveloperTools")]
        category: String,
    },
}

fn column_list() -> String {
    TABLE_COLUMNS.iter().map(|(field, _)| *field).collect::<Vec<_>>().join(", ")
}

fn parse_column(raw: &str) -> Result<String, String> {
    if is_table_column(raw) {
        Ok(raw.to_string())
    } else {
        Err(format!("unknown column '{}' (expected one of: {})", raw, column_list()))
    }
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", raw))?;
    Ok((parse_column(column.trim())?, value.to_string()))
}

fn parse_level(raw: &str) -> Result<LogLevel, String> {
    raw.parse::<LogLevel>().map_err(|e| e.to_string())
}
