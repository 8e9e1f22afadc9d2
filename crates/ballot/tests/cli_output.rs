//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.
//! Every test points BALLOT_STORE_FILE at its own temp dir so the real
//! store is never touched.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

/// Nothing listens here, so requests fail fast with connection refused.
const UNREACHABLE_API: &str = "http://127.0.0.1:1";

fn run_ballot(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ballot"))
        .current_dir(dir)
        .env("BALLOT_STORE_FILE", dir.join("store.json"))
        .env("BALLOT_API_URL", UNREACHABLE_API)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute ballot")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_login_then_logout() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_ballot(temp_dir.path(), &["login", "--token", "jwt-123"]);
    assert!(
        output.status.success(),
        "login failed: {}",
        stderr_of(&output)
    );
    assert!(stdout_of(&output).contains("Logged in"));

    let stored = fs::read_to_string(temp_dir.path().join("store.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["token"], "jwt-123");

    let output = run_ballot(temp_dir.path(), &["logout"]);
    assert!(output.status.success());
    let stored = fs::read_to_string(temp_dir.path().join("store.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert!(stored.get("token").is_none());
}

#[test]
fn test_missing_token_points_to_login() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_ballot(temp_dir.path(), &["candidates", "12"]);

    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("Not logged in"),
        "Expected login error in stderr, got: {}",
        stderr
    );
    assert!(stderr.contains("ballot login --token"));
}

#[test]
fn test_status_fails_open_when_service_unreachable() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    run_ballot(temp_dir.path(), &["login", "--token", "jwt"]);

    let output = run_ballot(temp_dir.path(), &["status", "12"]);

    assert!(
        output.status.success(),
        "status failed: {}",
        stderr_of(&output)
    );
    assert!(stdout_of(&output).contains("You have not voted in election 12"));
}

#[test]
fn test_status_fail_closed_from_project_config() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join(".ballot");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[voting]\nfail_closed = true\n",
    )
    .unwrap();
    run_ballot(temp_dir.path(), &["login", "--token", "jwt"]);

    let output = run_ballot(temp_dir.path(), &["status", "12"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Vote Status Unavailable"));
}

#[test]
fn test_invalid_api_url_is_rejected() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_ballot(
        temp_dir.path(),
        &["status", "12", "--api-url", "ftp://vote.example.edu"],
    );

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Invalid API base URL"));
}

#[test]
fn test_config_warning_on_invalid_toml() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join(".ballot");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "invalid toml [[[").unwrap();

    // Fails for lack of a token, after the warning is printed
    let output = run_ballot(temp_dir.path(), &["status", "12"]);

    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("Warning: Could not load config"),
        "Expected warning in stderr, got: {}",
        stderr
    );
    assert!(stderr.contains("Tip: Check"));
}

/// Verify that stdout contains only user-facing output (no JSON logs)
/// and that stderr has no INFO logs by default (quiet mode)
#[test]
fn test_stdout_is_clean_by_default() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_ballot(temp_dir.path(), &["login", "--token", "jwt"]);

    let stdout = stdout_of(&output);
    for line in stdout.lines() {
        assert!(
            !line.trim().starts_with('{'),
            "stdout should not contain JSON lines, got: {}",
            line
        );
    }
    assert!(
        !stderr_of(&output).contains(r#""level":"INFO""#),
        "Default mode should not emit INFO logs"
    );
}

#[test]
fn test_verbose_emits_json_logs_on_stderr() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_ballot(temp_dir.path(), &["-v", "login", "--token", "jwt"]);

    assert!(output.status.success());
    let stderr = stderr_of(&output);
    assert!(
        stderr.contains(r#""level":"INFO""#),
        "Verbose mode should emit INFO logs, got: {}",
        stderr
    );
    assert!(stderr.contains("cli.login_completed"));
    assert!(!stdout_of(&output).contains(r#""event":"#));
}
