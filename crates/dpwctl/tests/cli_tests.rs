//! CLI integration tests for dpwctl
//!
//! Runs the built binary with an isolated config directory and a runtime
//! config file pointing at a mock API:
//! - dpwctl classify MESSAGE       category and user message
//! - dpwctl assignments --json     fetch, filter, sort and page
//! - dpwctl assignments            API failure exit code
//! - dpwctl config --json          runtime config and fallback
//! - dpwctl whoami                 signed-out exit code

use serde_json::{json, Value};
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ASSIGNMENT_PATH: &str = "/Integration/DPW/ItemDefaultCustomer/Get";

fn dpwctl(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dpwctl"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env("NO_COLOR", "1")
        .env_remove("DPW_RUNTIME_CONFIG")
        .env_remove("DPW_ACCOUNT")
        .env_remove("DPW_ACCOUNT_NAME")
        .env_remove("DPW_ACCESS_TOKEN")
        .env_remove("DPW_LOG");
    cmd
}

fn write_runtime_config(dir: &Path, api: &str) -> String {
    let config = json!({
        "Environment": "Staging",
        "AppName": "Demand Planning Web",
        "API_BASE_URL": api,
        "ClientRequestWaitTimeMinutes": 1,
        "HttpSettings": {
            "MaxRetryCountForApi": "3",
            "WaitTimeInSecsForApiRetry": "10"
        }
    });
    let path = dir.join("config.json");
    std::fs::write(&path, config.to_string()).unwrap();
    path.display().to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn record(item: &str, customer: &str, date: &str) -> Value {
    json!({
        "ItemNumber": item,
        "DefaultCustomerNumber": customer,
        "dtea": date,
        "usra": "alice"
    })
}

async fn mock_assignments(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ASSIGNMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [
                record("X1", "HSENT", "2024-01-01T00:00:00Z"),
                record("X2", "RHCUST", "2024-01-02T00:00:00Z"),
                record("X3", "HSENT", "2024-01-03T00:00:00Z"),
            ],
            "PageNumber": 1,
            "TotalPages": 1,
            "TotalCount": 3,
            "HasPreviousPage": false,
            "HasNextPage": false
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_classify_server_error() {
    let home = TempDir::new().unwrap();
    let output = dpwctl(home.path())
        .args(["classify", "API call failed: 500"])
        .output()
        .await
        .unwrap();

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("server"));
    assert!(out.contains("Server error. Please try again later."));
}

#[tokio::test]
async fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    let output = dpwctl(home.path()).arg("--help").output().await.unwrap();

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("assignments"));
    assert!(out.contains("whoami"));
    assert!(!out.contains("classify"));
}

#[tokio::test]
async fn test_bad_filter_rejected() {
    let home = TempDir::new().unwrap();
    let output = dpwctl(home.path())
        .args(["assignments", "--filter", "color=blue"])
        .output()
        .await
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown column"));
}

#[tokio::test]
async fn test_assignments_json_filtered_and_sorted() {
    let server = MockServer::start().await;
    mock_assignments(&server).await;

    let home = TempDir::new().unwrap();
    let source = write_runtime_config(home.path(), &server.uri());

    let output = dpwctl(home.path())
        .args([
            "--runtime-config",
            &source,
            "assignments",
            "--filter",
            "customerGroup=hsent",
            "--sort",
            "itemId",
            "--desc",
            "--json",
        ])
        .output()
        .await
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let page: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(page["total"], 2);
    assert_eq!(page["page"], 1);
    let ids: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["itemId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["X3", "X1"]);
}

#[tokio::test]
async fn test_assignments_api_failure_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ASSIGNMENT_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let source = write_runtime_config(home.path(), &server.uri());

    let output = dpwctl(home.path())
        .args(["--runtime-config", &source, "assignments"])
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(70));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("Error loading item assignments"));
    assert!(err.contains("Server error. Please try again later."));
}

#[tokio::test]
async fn test_config_json_reports_fallback() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("missing.json").display().to_string();

    let output = dpwctl(home.path())
        .args(["--runtime-config", &missing, "config", "--json"])
        .output()
        .await
        .unwrap();

    assert!(output.status.success());
    let config: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(config["fallback"], true);
    assert_eq!(config["runtime"]["Environment"], "Error - Fallback");
}

#[tokio::test]
async fn test_whoami_signed_out() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("missing.json").display().to_string();

    let output = dpwctl(home.path())
        .args(["--runtime-config", &missing, "whoami"])
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(77));
    assert!(stdout(&output).contains("Authentication Required"));
}
