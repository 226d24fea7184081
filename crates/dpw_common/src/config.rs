//! Runtime configuration
//!
//! Loaded once at startup from a URL or a local file. Any failure degrades to
//! [`AppConfig::fallback`] instead of stopping the client.

use crate::error::{DpwError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_CONFIG_SOURCE: &str = "config.json";

const FALLBACK_API_BASE_URL: &str = "https://aarcwivdsq14182.ashleyfurniture.com/Integrations/api";

/// Retry knobs shipped with the runtime config. Values arrive as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(rename = "MaxRetryCountForApi")]
    pub max_retry_count_for_api: String,
    #[serde(rename = "WaitTimeInSecsForApiRetry")]
    pub wait_time_in_secs_for_api_retry: String,
}

impl HttpSettings {
    pub fn max_retry_count(&self) -> Option<u32> {
        self.max_retry_count_for_api.trim().parse().ok()
    }

    pub fn retry_wait(&self) -> Option<Duration> {
        self.wait_time_in_secs_for_api_retry
            .trim()
            .parse()
            .ok()
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "Environment")]
    pub environment: String,
    #[serde(rename = "AppName")]
    pub app_name: String,
    #[serde(rename = "API_BASE_URL")]
    pub api_base_url: String,
    #[serde(rename = "ClientRequestWaitTimeMinutes")]
    pub client_request_wait_time_minutes: u64,
    #[serde(rename = "HttpSettings")]
    pub http_settings: HttpSettings,
}

impl AppConfig {
    /// Configuration used when the real one cannot be loaded
    pub fn fallback() -> Self {
        Self {
            environment: "Error - Fallback".to_string(),
            app_name: "Demand Planning Web".to_string(),
            api_base_url: FALLBACK_API_BASE_URL.to_string(),
            client_request_wait_time_minutes: 1,
            http_settings: HttpSettings {
                max_retry_count_for_api: "2".to_string(),
                wait_time_in_secs_for_api_retry: "5".to_string(),
            },
        }
    }

    pub fn environment_kind(&self) -> EnvironmentKind {
        EnvironmentKind::from_name(&self.environment)
    }
}

/// Deployment environment, as far as presentation cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    Production,
    Staging,
    Development,
    Other,
}

impl EnvironmentKind {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "production" | "prod" => EnvironmentKind::Production,
            "staging" | "stage" => EnvironmentKind::Staging,
            "development" | "dev" | "local" => EnvironmentKind::Development,
            _ => EnvironmentKind::Other,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, EnvironmentKind::Development)
    }
}

/// Where the runtime config comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Url(String),
    File(PathBuf),
}

impl ConfigSource {
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ConfigSource::Url(trimmed.to_string())
        } else {
            ConfigSource::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Url(url) => f.write_str(url),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Result of startup configuration
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: ConfigSource,
    /// Set when the fallback replaced the real config; holds the load error
    pub fallback_reason: Option<String>,
}

impl LoadedConfig {
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Fetch and parse the runtime config, without fallback.
pub async fn fetch_runtime_config(source: &ConfigSource, http: &reqwest::Client) -> Result<AppConfig> {
    match source {
        ConfigSource::Url(url) => {
            let response = http
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| DpwError::network(url, e))?;

            if !response.status().is_success() {
                return Err(DpwError::Config(format!(
                    "Failed to fetch config.json: {}",
                    response.status()
                )));
            }

            response
                .json::<AppConfig>()
                .await
                .map_err(|e| DpwError::decode(url, e))
        }
        ConfigSource::File(path) => {
            let contents = tokio::fs::read_to_string(path).await?;
            Ok(serde_json::from_str(&contents)?)
        }
    }
}

/// Load the runtime config, substituting the fallback on any failure.
pub async fn load_runtime_config(source: ConfigSource, http: &reqwest::Client) -> LoadedConfig {
    match fetch_runtime_config(&source, http).await {
        Ok(config) => {
            info!(
                source = %source,
                environment = %config.environment,
                api = %config.api_base_url,
                "Runtime configuration loaded successfully"
            );
            LoadedConfig {
                config,
                source,
                fallback_reason: None,
            }
        }
        Err(e) => {
            error!(source = %source, error = %e, "CRITICAL: Could not load runtime configuration");
            LoadedConfig {
                config: AppConfig::fallback(),
                source,
                fallback_reason: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "Environment": "Development",
        "AppName": "Demand Planning Web",
        "API_BASE_URL": "https://dpw.example.com/api",
        "ClientRequestWaitTimeMinutes": 2,
        "HttpSettings": { "MaxRetryCountForApi": "3", "WaitTimeInSecsForApiRetry": "10" }
    }"#;

    #[test]
    fn test_parse_runtime_config() {
        let config: AppConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(config.api_base_url, "https://dpw.example.com/api");
        assert_eq!(config.client_request_wait_time_minutes, 2);
        assert_eq!(config.http_settings.max_retry_count(), Some(3));
        assert_eq!(config.http_settings.retry_wait(), Some(Duration::from_secs(10)));
        assert!(config.environment_kind().is_development());
    }

    #[test]
    fn test_fallback_values() {
        let config = AppConfig::fallback();
        assert_eq!(config.environment, "Error - Fallback");
        assert_eq!(config.app_name, "Demand Planning Web");
        assert_eq!(config.http_settings.max_retry_count(), Some(2));
        assert_eq!(config.environment_kind(), EnvironmentKind::Other);
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!(
            ConfigSource::parse("https://host/config.json"),
            ConfigSource::Url("https://host/config.json".into())
        );
        assert_eq!(
            ConfigSource::parse("./config.json"),
            ConfigSource::File(PathBuf::from("./config.json"))
        );
    }

    #[test]
    fn test_unparseable_retry_settings() {
        let settings = HttpSettings {
            max_retry_count_for_api: "two".into(),
            wait_time_in_secs_for_api_retry: "".into(),
        };
        assert_eq!(settings.max_retry_count(), None);
        assert_eq!(settings.retry_wait(), None);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = ConfigSource::File(file.path().to_path_buf());
        let loaded = load_runtime_config(source, &reqwest::Client::new()).await;
        assert!(!loaded.is_fallback());
        assert_eq!(loaded.config.environment, "Development");
    }

    #[tokio::test]
    async fn test_missing_file_falls_back() {
        let source = ConfigSource::File(PathBuf::from("/nonexistent/dpw/config.json"));
        let loaded = load_runtime_config(source, &reqwest::Client::new()).await;
        assert!(loaded.is_fallback());
        assert_eq!(loaded.config, AppConfig::fallback());
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let loaded = load_runtime_config(
            ConfigSource::File(file.path().to_path_buf()),
            &reqwest::Client::new(),
        )
        .await;
        assert!(loaded.is_fallback());
    }
}
