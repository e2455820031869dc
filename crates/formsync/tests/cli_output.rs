//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.
//! None of these tests need a reachable API server.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const CONFIG: &str = r#"
[api]
base_url = "http://api.example.test/v1"
timeout_secs = 3

[polling]
table_interval_ms = 5000

[table]
status = "open"
"#;

fn formsync(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_formsync"))
        .current_dir(dir)
        .env_remove("FORMSYNC_API_TOKEN")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute formsync")
}

fn write_config(dir: &Path) -> String {
    let path = dir.join("formsync.toml");
    fs::write(&path, CONFIG).expect("Failed to write config");
    path.display().to_string()
}

/// Verify `config` prints the merged configuration and nothing else on stdout
#[test]
fn test_config_prints_effective_toml() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(temp_dir.path());

    let output = formsync(temp_dir.path(), &["config", "--config", &path]);
    assert!(
        output.status.success(),
        "formsync config failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#"base_url = "http://api.example.test/v1""#));
    assert!(stdout.contains("table_interval_ms = 5000"));
    // Unset values are resolved to their defaults
    assert!(stdout.contains("detail_interval_ms = 15000"));
    assert!(stdout.contains(r#"status = "open""#));
    assert!(!stdout.contains(r#""event":"#), "stdout should not contain JSON logs");
}

/// Verify that default mode suppresses INFO-level logs
#[test]
fn test_default_mode_suppresses_info_logs() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(temp_dir.path());

    let output = formsync(temp_dir.path(), &["config", "--config", &path]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should suppress INFO logs, but stderr contains: {}",
        stderr
    );
}

/// Verify verbose mode emits JSON INFO logs on stderr, also after the subcommand
#[test]
fn test_verbose_flag_emits_info_logs() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(temp_dir.path());

    for args in [
        vec!["-v", "config", "--config", &path],
        vec!["config", "--verbose", "--config", &path],
    ] {
        let output = formsync(temp_dir.path(), &args);
        assert!(output.status.success());

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains(r#""level":"INFO""#),
            "Verbose mode should emit INFO logs, but stderr is: {}",
            stderr
        );
        assert!(stderr.contains("core.app.startup_completed"));
    }
}

/// Verify the API token never reaches stdout
#[test]
fn test_config_redacts_token_from_env() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(temp_dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_formsync"))
        .current_dir(temp_dir.path())
        .env("FORMSYNC_API_TOKEN", "s3cr3t-token")
        .args(["config", "--config", &path])
        .output()
        .expect("Failed to execute formsync");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<redacted>"));
    assert!(!stdout.contains("s3cr3t-token"));
}

/// Verify a broken project config falls back to defaults with a warning
#[test]
fn test_config_warning_on_invalid_toml() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join(".formsync");
    fs::create_dir_all(&config_dir).expect("Failed to create .formsync dir");
    fs::write(config_dir.join("config.toml"), "invalid toml [[[")
        .expect("Failed to write invalid config");

    let output = formsync(temp_dir.path(), &["config"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains("Warning: Could not load config"),
        "Expected warning in stderr, got: {}",
        stderr
    );
    assert!(stderr.contains("Tip: Check"));
}

/// Verify the environment token survives the fallback to defaults
#[test]
fn test_fallback_config_keeps_env_token() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join(".formsync");
    fs::create_dir_all(&config_dir).expect("Failed to create .formsync dir");
    fs::write(config_dir.join("config.toml"), "invalid toml [[[")
        .expect("Failed to write invalid config");

    let output = Command::new(env!("CARGO_BIN_EXE_formsync"))
        .current_dir(temp_dir.path())
        .env("FORMSYNC_API_TOKEN", "s3cr3t-token")
        .args(["config"])
        .output()
        .expect("Failed to execute formsync");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Warning: Could not load config"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(r#"token = "<redacted>""#),
        "Fallback config lost the token: {}",
        stdout
    );
}

/// Verify an explicit config path that does not exist is an error
#[test]
fn test_missing_explicit_config_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("nope.toml");

    let output = formsync(
        temp_dir.path(),
        &["config", "--config", &missing.display().to_string()],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load config"));
}

/// Verify a short cancellation comment is rejected before any request
#[test]
fn test_cancel_rejects_short_comment() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = formsync(temp_dir.path(), &["cancel", "4", "9", "--comment", "no"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 4 characters"));
}

/// Verify an unreachable server is reported as a failed command
#[test]
fn test_list_reports_unreachable_server() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(temp_dir.path());

    let output = formsync(
        temp_dir.path(),
        &["list", "--config", &path, "--base-url", "http://127.0.0.1:9/api/v1"],
    );
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.is_empty(), "stdout should stay empty, got: {}", stdout);
    assert!(stderr.contains("list failed"), "stderr: {}", stderr);
}

/// Verify completion scripts are generated for the binary name
#[test]
fn test_completions_bash() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = formsync(temp_dir.path(), &["completions", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("formsync"));
}

/// Verify a choice question without options is a usage error
#[test]
fn test_create_rejects_choice_without_options() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = formsync(
        temp_dir.path(),
        &[
            "create",
            "--app-id",
            "hr",
            "--title",
            "Laptop request",
            "--description",
            "New hire",
            "--email",
            "jane@example.com",
            "--question",
            "Which model?:dropdown",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("needs options"));
}

/// Verify an answer submission against an unreachable server fails cleanly
#[test]
fn test_respond_reports_unreachable_server() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(temp_dir.path());

    let output = formsync(
        temp_dir.path(),
        &[
            "respond",
            "tok123",
            "5",
            "--app-id",
            "hr",
            "--answer",
            "1=yes",
            "--config",
            &path,
            "--base-url",
            "http://127.0.0.1:9/api/v1",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("respond failed"));
}
