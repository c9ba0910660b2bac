//! End-to-end CLI tests exercising the compiled binary.
//!
//! Covers the help surface, exit codes and stderr for configuration
//! failures, and one full round trip against a mock server.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn aggctl() -> Command {
    let mut cmd = Command::cargo_bin("aggctl").expect("binary builds");
    // Keep tests hermetic: never pick up the developer's real profile.
    cmd.env_remove("AGGCTL_CONFIG");
    cmd
}

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).expect("write config");
    path
}

// =============================================================================
// Help and Usage
// =============================================================================

#[test]
fn help_lists_every_command() {
    aggctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("projects"))
        .stdout(predicate::str::contains("aggregates"))
        .stdout(predicate::str::contains("rebuild"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("token"));
}

#[test]
fn aggregates_without_cube_id_is_a_usage_error() {
    aggctl()
        .args(["aggregates", "--project-id", "p1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--cube-id"));
}

// =============================================================================
// Configuration Failures
// =============================================================================

#[test]
fn missing_config_exits_with_config_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    aggctl()
        .args(["--config", missing.to_str().unwrap(), "projects"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn malformed_toml_exits_with_config_error() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "instance = [not toml");

    aggctl()
        .args(["--config", config.to_str().unwrap(), "projects"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("config parse error"));
}

#[test]
fn invalid_profile_names_the_missing_fields() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
        instance = "installer"
        host = "bi.example.com"
        username = "admin"
        "#,
    );

    aggctl()
        .args(["--config", config.to_str().unwrap(), "projects"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("installer"))
        .stderr(predicate::str::contains("password"))
        .stderr(predicate::str::contains("organization"));
}

#[test]
fn no_command_without_a_tty_is_a_usage_error() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
        instance = "container"
        host = "bi.example.com"
        token = "static-token"
        "#,
    );

    // Piped stdin means no TTY, so the interactive menu must refuse.
    aggctl()
        .args(["--config", config.to_str().unwrap()])
        .write_stdin("")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("no command given"));
}

// =============================================================================
// Round Trip
// =============================================================================

#[tokio::test]
async fn projects_json_round_trip_against_mock_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/catalogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "cat-1",
            "name": "Sales",
            "models": [{"id": "mod-1", "name": "Orders", "caption": ""}]
        }])))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        &format!(
            r#"
            instance = "container"
            host = "{}"
            token = "static-token"
            "#,
            server.uri()
        ),
    );
    let config = config.to_str().unwrap().to_string();

    // assert_cmd is blocking; keep the mock server's runtime responsive.
    let output = tokio::task::spawn_blocking(move || {
        aggctl()
            .args(["--config", &config, "--json", "projects"])
            .output()
            .expect("run binary")
    })
    .await
    .expect("join");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let projects: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(projects[0]["name"], "Sales");
    assert_eq!(projects[0]["cubes"][0]["id"], "mod-1");
}
