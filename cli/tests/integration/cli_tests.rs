//! Integration tests for the CLI skeleton: help, version, argument errors.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::fixtures::infratest;

#[test]
fn test_cli_no_args_shows_help() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    infratest()
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Integration tests for Terraform-provisioned infrastructure",
        ));
}

#[test]
fn test_no_color_env_accepts_any_value() {
    for value in ["1", "true", "yes", ""] {
        infratest()
            .arg("version")
            .env("NO_COLOR", value)
            .assert()
            .success()
            .stdout(predicate::str::contains("infratest v0.1.0"))
            .stdout(predicate::str::contains("\x1b[").not());
    }
}

#[test]
fn test_no_color_env_keeps_help_on_bare_invocation() {
    infratest()
        .env("NO_COLOR", "1")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"))
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_help_lists_commands() {
    infratest()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    infratest()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("infratest"));
}

#[test]
fn test_version_command_shows_version() {
    infratest()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("infratest v0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = infratest()
        .args(["version", "--json"])
        .output()
        .expect("run infratest");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(v["version"], "0.1.0");
}

#[test]
fn test_run_help_shows_flags() {
    infratest()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--scenario"))
        .stdout(predicate::str::contains("--parallel"));
}

#[test]
fn test_run_without_suite_fails() {
    infratest().arg("run").assert().code(2);
}

#[test]
fn test_missing_suite_file_reports_error() {
    infratest()
        .args(["check", "/nonexistent/suite.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: cannot read"));
}

#[test]
fn test_json_mode_reports_error_as_json() {
    let output = infratest()
        .args(["--json", "check", "/nonexistent/suite.yaml"])
        .output()
        .expect("run infratest");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "COMMAND_FAILED");
    assert!(
        v["message"]
            .as_str()
            .is_some_and(|m| m.contains("cannot read"))
    );
}

#[test]
fn test_invalid_env_setting_reports_error() {
    infratest()
        .args(["version"])
        .env("INFRATEST_COMMAND_TIMEOUT_SECS", "soon")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("INFRATEST_"));
}
