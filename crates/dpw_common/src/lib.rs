//! DPW Common - Services and view state for the Demand Planning client
//!
//! Error classification, notifications, async error scopes, table state and
//! search, the item assignment data service, runtime configuration, the remote
//! log sink, and authentication plumbing. The terminal front end lives in
//! `dpwctl`.

pub mod activity;
pub mod async_error;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod item_assignment;
pub mod notify;
pub mod profile;
pub mod remote_log;
pub mod settings;
pub mod table_search;
pub mod table_state;

pub use async_error::{AsyncErrorScope, AsyncOperationState, RetryOutcome};
pub use classifier::{classify, ErrorInfo, ErrorKind};
pub use config::{AppConfig, ConfigSource, LoadedConfig};
pub use context::AppContext;
pub use error::{DpwError, Failure};
pub use item_assignment::{ItemAssignment, ItemAssignmentService};
pub use notify::{Notifier, ToastQueue};
pub use table_search::{search_across_columns, ColumnSearchProps, Record};
pub use table_state::TableState;
