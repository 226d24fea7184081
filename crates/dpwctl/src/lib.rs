//! dpwctl library - exposes modules for integration tests

pub mod cli;
pub mod commands;
pub mod console;
pub mod errors;
pub mod logging;
pub mod output;
pub mod spinner;
pub mod theme;
pub mod tui;
