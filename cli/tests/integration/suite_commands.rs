//! Integration tests for `check`, `list` and `validate`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::fixtures::{Workspace, infratest};

const SUITE: &str = r"
name: video-ingest
settings:
  parallelism: 2
scenarios:
  - name: vpc-module
    terraform_dir: modules/vpc
    vars:
      vpc_cidr: 10.0.0.0/16
      availability_zones: [us-east-1a, us-east-1b]
    checks:
      - output: vpc_cidr_block
        expect:
          - equals: 10.0.0.0/16
  - name: s3-module
    terraform_dir: modules/s3
";

#[test]
fn test_check_valid_suite() {
    let ws = Workspace::new();
    let path = ws.write_suite(SUITE);
    infratest()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid (2 scenarios)"));
}

#[test]
fn test_check_json() {
    let ws = Workspace::new();
    let path = ws.write_suite(SUITE);
    let output = infratest()
        .args(["check", "--json"])
        .arg(&path)
        .output()
        .expect("run infratest");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(v["valid"], true);
    assert_eq!(v["scenarios"], 2);
}

#[test]
fn test_check_rejects_shared_target() {
    let ws = Workspace::new();
    let path = ws.write_suite(&SUITE.replace("modules/s3", "modules/vpc"));
    infratest()
        .arg("check")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("share terraform_dir"));
}

#[test]
fn test_check_rejects_duplicate_names() {
    let ws = Workspace::new();
    let path = ws.write_suite(&SUITE.replace("s3-module", "vpc-module"));
    infratest()
        .arg("check")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("duplicate scenario name 'vpc-module'"));
}

#[test]
fn test_check_rejects_zero_parallelism() {
    let ws = Workspace::new();
    let path = ws.write_suite(&SUITE.replace("parallelism: 2", "parallelism: 0"));
    infratest()
        .arg("check")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("parallelism"));
}

#[test]
fn test_check_rejects_bad_retryable_pattern() {
    let ws = Workspace::new();
    let path = ws.write_suite(&SUITE.replace(
        "parallelism: 2",
        "parallelism: 2\n  retryable_errors:\n    \"(unclosed\": broken",
    ));
    infratest()
        .arg("check")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "invalid retryable error pattern '(unclosed'",
        ));
}

#[test]
fn test_check_shipped_suite() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../suites/video-ingest.yaml");
    infratest()
        .args(["check", path])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid (4 scenarios)"));
}

#[test]
fn test_list_shipped_suite() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../suites/video-ingest.yaml");
    infratest()
        .args(["list", path])
        .assert()
        .success()
        .stdout(predicate::str::contains("vpc-module:"))
        .stdout(predicate::str::contains("(10 vars, 0 var files, 5 checks)"));
}

#[test]
fn test_check_rejects_malformed_yaml() {
    let ws = Workspace::new();
    let path = ws.write_suite("name: [unterminated\n");
    infratest()
        .arg("check")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}

#[test]
fn test_list_shows_scenarios() {
    let ws = Workspace::new();
    let path = ws.write_suite(SUITE);
    infratest()
        .arg("list")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Suite video-ingest"))
        .stdout(predicate::str::contains("vpc-module:"))
        .stdout(predicate::str::contains("s3-module:"));
}

#[test]
fn test_list_json_resolves_paths() {
    let ws = Workspace::new();
    let path = ws.write_suite(SUITE);
    let output = infratest()
        .args(["list", "--json"])
        .arg(&path)
        .output()
        .expect("run infratest");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let dir = v["scenarios"][0]["terraform_dir"].as_str().expect("string");
    assert_eq!(
        std::path::Path::new(dir),
        ws.path().join("modules").join("vpc")
    );
}

#[cfg(unix)]
#[test]
fn test_validate_runs_init_and_validate_only() {
    let ws = Workspace::new();
    let path = ws.write_suite(SUITE);
    ws.command()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 targets valid"));

    assert_eq!(ws.calls_for("vpc"), vec!["init", "validate"]);
    assert_eq!(ws.calls_for("s3"), vec!["init", "validate"]);
}
