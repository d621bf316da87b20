//! CLI integration tests
//!
//! Tests for the command-line interface using assert_cmd.
//!
//! These tests verify:
//! - Help and version flags
//! - Configuration validation
//! - Single-cycle polling against a mock Solr server
//! - Fatal exit when retries are exhausted

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a command for the rsolr-exporter binary
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("rsolr-exporter").expect("Failed to find rsolr-exporter binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Helper to create a temporary config file with given content
fn create_temp_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file.flush().expect("Failed to flush");
    file
}

/// Test --help flag displays usage information
#[test]
fn test_help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:").or(predicate::str::contains("usage:")))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--core-name"));
}

/// Test --version flag displays version
#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that a valid configuration is accepted via --validate flag
#[test]
fn test_validate_valid_config() {
    let config = r#"
solr:
  base_url: "http://localhost:8983/solr/"
  core_name: products
  timeout_ms: 5000

polling:
  interval_ms: 10000
  retry_count: 3
  retry_delay_ms: 1000

mappings:
  - endpoint: mbeans
    path: [solr-mbeans, CACHE, filterCache, stats, hits]
    name: SOLR_CACHE_FILTER_HITS
    accumulate: true
"#;

    let file = create_temp_config(config);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("core_name: products"))
        .stdout(predicate::str::contains("extra mappings: 1"));
}

/// Test that a missing config file falls back to defaults
#[test]
fn test_missing_config_uses_defaults() {
    cmd()
        .arg("-c")
        .arg("/nonexistent/path/config.yaml")
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8983/solr/"));
}

/// Test that invalid YAML is rejected
#[test]
fn test_validate_invalid_config_bad_yaml() {
    let config = r#"
solr:
  base_url: [not valid yaml
"#;

    let file = create_temp_config(config);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .assert()
        .failure();
}

/// Test that a zero polling interval is rejected
#[test]
fn test_invalid_interval_zero() {
    let config = r#"
polling:
  interval_ms: 0
"#;

    let file = create_temp_config(config);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval"));
}

/// Test that a CLI override replaces an invalid file value before validation
#[test]
fn test_cli_interval_overrides_invalid_file_value() {
    let config = r#"
polling:
  interval_ms: 0
"#;

    let file = create_temp_config(config);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--interval-ms")
        .arg("5000")
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("interval_ms: 5000"));
}

/// Test that a duplicate mapping name is rejected
#[test]
fn test_duplicate_mapping_rejected() {
    let config = r#"
mappings:
  - endpoint: threads
    path: [system, threadCount, current]
    name: SOLR_THREAD_CURRENT
"#;

    let file = create_temp_config(config);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SOLR_THREAD_CURRENT"));
}

/// Test that the base URL can be overridden via CLI and is validated
#[test]
fn test_base_url_override_validated() {
    cmd()
        .arg("-c")
        .arg("/nonexistent/path/config.yaml")
        .arg("--base-url")
        .arg("not a url")
        .arg("--validate")
        .assert()
        .failure();

    cmd()
        .arg("-c")
        .arg("/nonexistent/path/config.yaml")
        .arg("--base-url")
        .arg("http://solr.internal:8983/solr/")
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://solr.internal:8983/solr/"));
}

/// Test the environment variable override
#[test]
fn test_env_core_name_override() {
    cmd()
        .env("RSOLR_CORE_NAME", "from_env")
        .arg("-c")
        .arg("/nonexistent/path/config.yaml")
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("core_name: from_env"));
}

/// Test a single poll cycle prints metric lines on stdout
#[tokio::test(flavor = "multi_thread")]
async fn test_once_prints_metrics() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/solr/admin/info/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mode": "solrcloud",
            "system": {"committedVirtualMemorySize": 123456}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/solr/admin/info/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/solr/mycore/admin/mbeans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "solr-mbeans": {"CACHE": {"documentCache": {"stats": {"hits": 77}}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/solr/", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        cmd()
            .arg("-c")
            .arg("/nonexistent/path/config.yaml")
            .arg("--base-url")
            .arg(base_url)
            .arg("--core-name")
            .arg("mycore")
            .arg("--source")
            .arg("solr-01")
            .arg("--once")
            .timeout(std::time::Duration::from_secs(10))
            .output()
            .expect("Failed to run rsolr-exporter")
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "SOLR_RUN_MODE solrcloud solr-01\n\
         SOLR_SYSTEM_COMMITED_VIRTUAL_MEMORY_SIZE 123456 solr-01\n\
         SOLR_CACHE_DOCUMENT_HITS 77 solr-01\n"
    );
}

/// Test that exhausting the retry budget exits with failure
#[tokio::test(flavor = "multi_thread")]
async fn test_max_retries_exits_with_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let base_url = format!("{}/solr/", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        cmd()
            .arg("-c")
            .arg("/nonexistent/path/config.yaml")
            .arg("--base-url")
            .arg(base_url)
            .arg("--retry-count")
            .arg("2")
            .arg("--retry-delay-ms")
            .arg("10")
            .timeout(std::time::Duration::from_secs(10))
            .output()
            .expect("Failed to run rsolr-exporter")
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Max retries exceeded"));
}
