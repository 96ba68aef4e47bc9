use std::process::{Command, Output};
use tempfile::TempDir;

/// Integration tests for the gitcc command line
/// These tests run the actual binary and verify its behavior

fn gitcc() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_gitcc"));
    command.env_remove("RUST_LOG");
    command
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_help() {
    let output = gitcc().arg("--help").output().expect("Failed to execute gitcc");

    assert!(output.status.success());
    let stdout = stdout_of(&output);

    assert!(stdout.contains("gitcc [-l LANGUAGE] user"));
    assert!(stdout.contains("--language"));
    assert!(stdout.contains("--verbose"));
}

#[test]
fn test_cli_version() {
    let output = gitcc().arg("--version").output().expect("Failed to execute gitcc");

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("gitcc"));
}

#[test]
fn test_missing_user_prints_help() {
    let temp_dir = TempDir::new().unwrap();
    let output = gitcc()
        .env("GOPATH", temp_dir.path())
        .output()
        .expect("Failed to execute gitcc");

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Usage"));
    assert!(!stdout.contains("Fetching"));
}

#[test]
fn test_missing_gopath_prints_help() {
    let output = gitcc()
        .arg("octocat")
        .env_remove("GOPATH")
        .output()
        .expect("Failed to execute gitcc");

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Usage"));
    assert!(!stdout.contains("Fetching"));
    assert!(!stdout.contains("Done!"));
}

#[test]
fn test_empty_gopath_prints_help() {
    let output = gitcc()
        .args(["-l", "go", "octocat"])
        .env("GOPATH", "")
        .output()
        .expect("Failed to execute gitcc");

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Usage"));
}

#[test]
fn test_missing_gopath_creates_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output = gitcc()
        .arg("octocat")
        .env_remove("GOPATH")
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to execute gitcc");

    assert!(output.status.success());
    let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 0);
}

#[test]
fn test_invalid_flag() {
    let output = gitcc()
        .args(["--no-such-flag", "octocat"])
        .output()
        .expect("Failed to execute gitcc");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error") || stderr.contains("unexpected"));
}
