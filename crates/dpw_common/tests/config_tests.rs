//! Runtime config loading over HTTP and context wiring.

use dpw_common::auth::EnvironmentIdentity;
use dpw_common::config::{load_runtime_config, AppConfig, ConfigSource};
use dpw_common::notify::ToastQueue;
use dpw_common::settings::DpwSettings;
use dpw_common::AppContext;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn staging_config(api: &str) -> serde_json::Value {
    json!({
        "Environment": "Staging",
        "AppName": "Demand Planning Web",
        "API_BASE_URL": api,
        "ClientRequestWaitTimeMinutes": 2,
        "HttpSettings": {
            "MaxRetryCountForApi": "3",
            "WaitTimeInSecsForApiRetry": "10"
        }
    })
}

#[tokio::test]
async fn test_load_config_from_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(staging_config("https://api.example.com")))
        .expect(1)
        .mount(&server)
        .await;

    let source = ConfigSource::parse(&format!("{}/config.json", server.uri()));
    let loaded = load_runtime_config(source, &reqwest::Client::new()).await;

    assert!(!loaded.is_fallback());
    assert_eq!(loaded.config.environment, "Staging");
    assert_eq!(loaded.config.client_request_wait_time_minutes, 2);
    assert_eq!(loaded.config.http_settings.max_retry_count(), Some(3));
}

#[tokio::test]
async fn test_missing_config_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = ConfigSource::parse(&format!("{}/config.json", server.uri()));
    let loaded = load_runtime_config(source, &reqwest::Client::new()).await;

    assert!(loaded.is_fallback());
    assert_eq!(loaded.config, AppConfig::fallback());
    assert!(loaded.fallback_reason.unwrap().contains("404"));
}

#[tokio::test]
async fn test_bootstrap_wires_services_to_api_base() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(staging_config("https://api.example.com/")))
        .mount(&server)
        .await;

    let mut settings = DpwSettings::default();
    settings.runtime.source = format!("{}/config.json", server.uri());

    let ctx = AppContext::bootstrap(
        settings,
        Arc::new(ToastQueue::new()),
        Arc::new(EnvironmentIdentity::default()),
    )
    .await
    .unwrap();

    assert_eq!(ctx.remote_log.endpoint(), "https://api.example.com/logs");
    assert_eq!(
        ctx.assignments.endpoint(),
        "https://api.example.com/Integration/DPW/ItemDefaultCustomer/Get"
    );

    let scope = ctx.new_error_scope();
    assert!(scope.is_alive());
    assert!(scope.state().is_idle());
}
