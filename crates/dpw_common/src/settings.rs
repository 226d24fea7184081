//! Client settings
//!
//! Local preferences for the terminal client, separate from the runtime
//! config served next to the API.
//! Config file: ~/.config/dpw/config.toml or /etc/dpw/config.toml

use crate::auth::AuthConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `runtime.source`
pub const RUNTIME_SOURCE_ENV: &str = "DPW_RUNTIME_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// URL or path of the runtime config JSON
    #[serde(default = "default_runtime_source")]
    pub source: String,
}

fn default_runtime_source() -> String {
    crate::config::DEFAULT_CONFIG_SOURCE.to_string()
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            source: default_runtime_source(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    crate::table_state::DEFAULT_PAGE_SIZE
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default `tracing` filter when `DPW_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// Base URL of the directory API
    #[serde(default = "default_graph_base")]
    pub graph_base: String,
}

fn default_graph_base() -> String {
    crate::profile::DEFAULT_GRAPH_BASE.to_string()
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            graph_base: default_graph_base(),
        }
    }
}

/// Main client settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpwSettings {
    #[serde(default)]
    pub runtime: RuntimeSettings,

    #[serde(default)]
    pub table: TableSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub profile: ProfileSettings,
}

impl DpwSettings {
    /// Get default user settings path: ~/.config/dpw/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(config_dir.join("dpw").join("config.toml"))
    }

    /// Get system settings path: /etc/dpw/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/dpw/config.toml")
    }

    /// Load settings
    ///
    /// Priority:
    /// 1. User config (~/.config/dpw/config.toml)
    /// 2. System config (/etc/dpw/config.toml)
    /// 3. Defaults
    ///
    /// `DPW_RUNTIME_CONFIG` then overrides the runtime source.
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_file_chain()?;
        if let Ok(source) = std::env::var(RUNTIME_SOURCE_ENV) {
            if !source.trim().is_empty() {
                settings.runtime.source = source;
            }
        }
        Ok(settings)
    }

    fn load_file_chain() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: DpwSettings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, toml_string).with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }
}
