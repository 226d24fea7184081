//! Shared HTTP client construction

use crate::config::AppConfig;
use crate::error::{DpwError, Result};
use std::time::Duration;

pub fn user_agent() -> String {
    format!("dpwctl/{}", env!("CARGO_PKG_VERSION"))
}

/// Build the one client every service shares.
///
/// The request timeout follows `ClientRequestWaitTimeMinutes`; zero means one
/// minute.
pub fn build_client(config: &AppConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(request_timeout(config))
        .user_agent(user_agent())
        .build()
        .map_err(|e| DpwError::Config(format!("Failed to build HTTP client: {}", e)))
}

pub fn request_timeout(config: &AppConfig) -> Duration {
    let minutes = config.client_request_wait_time_minutes.max(1);
    Duration::from_secs(minutes.saturating_mul(60))
}

/// Client used before the runtime config is known
pub fn bootstrap_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(user_agent())
        .build()
        .map_err(|e| DpwError::Config(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_has_floor_of_one_minute() {
        let mut config = AppConfig::fallback();
        config.client_request_wait_time_minutes = 0;
        assert_eq!(request_timeout(&config), Duration::from_secs(60));
        config.client_request_wait_time_minutes = 3;
        assert_eq!(request_timeout(&config), Duration::from_secs(180));
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let mut config = AppConfig::fallback();
        config.client_request_wait_time_minutes = u64::MAX;
        assert_eq!(request_timeout(&config), Duration::from_secs(u64::MAX));
    }
}
