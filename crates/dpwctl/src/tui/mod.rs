//! TUI Module
//!
//! - event_loop: entry point, background tasks and action dispatch
//! - state: routes, session and key handling
//! - render: header, navigation, status bar and overlays
//! - layout: layout grid computation
//! - panic: terminal restore and crash report on panic
//! - assignments_view, dev_tools, pages: page bodies

mod assignments_view;
mod dev_tools;
mod event_loop;
mod layout;
mod pages;
mod panic;
mod render;
mod state;

pub use event_loop::run;
pub use event_loop::TuiMessage;
pub use state::Route;
