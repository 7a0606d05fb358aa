//! Unit tests for `run_suite` and `validate_suite`.

#![allow(clippy::expect_used)]

use infratest::application::services::suite_run::{run_suite, validate_suite};
use infratest::domain::{
    Expectation, HarnessSettings, Outcome, OutputCheck, Scenario, Suite, SuiteError,
    SuiteSettings, Teardown,
};

use crate::helpers::{MockCommandRunner, RecordingReporter, err_output, mock_terraform};

fn settings() -> HarnessSettings {
    HarnessSettings {
        retry_delay_secs: Some(0),
        ..HarnessSettings::default()
    }
}

fn suite(names: &[&str]) -> Suite {
    Suite {
        name: "video-ingest".to_string(),
        settings: SuiteSettings::default(),
        scenarios: names
            .iter()
            .map(|n| Scenario::new(*n, format!("/t/{n}")))
            .collect(),
    }
}

#[tokio::test]
async fn test_every_scenario_runs_and_is_destroyed() {
    let runner = MockCommandRunner::new();
    let tf = mock_terraform(&runner);

    let report = run_suite(
        &suite(&["dev", "staging", "vpc-module", "s3-module"]),
        &settings(),
        None,
        &tf,
        &RecordingReporter::default(),
    )
    .await
    .expect("valid suite");

    assert!(report.passed());
    assert_eq!(report.passed_count(), 4);
    for name in ["dev", "staging", "vpc-module", "s3-module"] {
        assert_eq!(
            runner.subcommands_in(&format!("/t/{name}")),
            vec!["init", "apply", "destroy"],
            "{name}"
        );
    }
}

#[tokio::test]
async fn test_failing_scenario_does_not_affect_others() {
    let runner = MockCommandRunner::new().on(
        "-chdir=/t/dev apply",
        err_output(1, b"Error: InvalidParameterValue"),
    );
    let tf = mock_terraform(&runner);

    let report = run_suite(
        &suite(&["dev", "staging"]),
        &settings(),
        None,
        &tf,
        &RecordingReporter::default(),
    )
    .await
    .expect("valid suite");

    assert!(!report.passed());
    assert_eq!(report.failed_count(), 1);
    assert!(matches!(report.scenarios[0].outcome, Outcome::Errored { .. }));
    assert_eq!(report.scenarios[0].teardown, Teardown::Destroyed);
    assert_eq!(report.scenarios[1].outcome, Outcome::Passed);
    assert_eq!(runner.subcommands_in("/t/dev"), vec!["init", "apply", "destroy"]);
}

#[tokio::test]
async fn test_report_keeps_declaration_order() {
    let runner = MockCommandRunner::new();
    let tf = mock_terraform(&runner);

    let report = run_suite(
        &suite(&["s3-module", "dev", "vpc-module"]),
        &settings(),
        Some(3),
        &tf,
        &RecordingReporter::default(),
    )
    .await
    .expect("valid suite");

    let names: Vec<_> = report.scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["s3-module", "dev", "vpc-module"]);
}

#[tokio::test]
async fn test_parallelism_one_runs_sequentially() {
    let runner = MockCommandRunner::new();
    let tf = mock_terraform(&runner);

    run_suite(
        &suite(&["dev", "staging"]),
        &settings(),
        Some(1),
        &tf,
        &RecordingReporter::default(),
    )
    .await
    .expect("valid suite");

    let dirs: Vec<_> = runner.calls().into_iter().map(|c| c.args[0].clone()).collect();
    assert_eq!(
        dirs,
        vec![
            "-chdir=/t/dev",
            "-chdir=/t/dev",
            "-chdir=/t/dev",
            "-chdir=/t/staging",
            "-chdir=/t/staging",
            "-chdir=/t/staging",
        ]
    );
}

#[tokio::test]
async fn test_scenarios_run_concurrently_by_default() {
    let runner = MockCommandRunner::new();
    let tf = mock_terraform(&runner);

    run_suite(
        &suite(&["dev", "staging"]),
        &settings(),
        None,
        &tf,
        &RecordingReporter::default(),
    )
    .await
    .expect("valid suite");

    let calls = runner.calls();
    assert_eq!(calls[0].args[0], "-chdir=/t/dev");
    assert_eq!(calls[1].args[0], "-chdir=/t/staging");
}

#[tokio::test]
async fn test_suite_parallelism_setting_is_used() {
    let runner = MockCommandRunner::new();
    let tf = mock_terraform(&runner);
    let mut suite = suite(&["dev", "staging"]);
    suite.settings.parallelism = Some(1);

    run_suite(&suite, &settings(), None, &tf, &RecordingReporter::default())
        .await
        .expect("valid suite");

    assert_eq!(runner.calls()[1].args[0], "-chdir=/t/dev");
}

#[tokio::test]
async fn test_invalid_suite_runs_nothing() {
    let runner = MockCommandRunner::new();
    let tf = mock_terraform(&runner);
    let mut invalid = suite(&["dev", "staging"]);
    invalid.scenarios[1].terraform_dir = "/t/dev".into();

    let err = run_suite(&invalid, &settings(), None, &tf, &RecordingReporter::default())
        .await
        .expect_err("shared target");
    assert!(matches!(
        err.downcast_ref::<SuiteError>(),
        Some(SuiteError::SharedTarget { .. })
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_zero_parallelism_is_rejected() {
    let runner = MockCommandRunner::new();
    let tf = mock_terraform(&runner);
    let err = run_suite(
        &suite(&["dev"]),
        &settings(),
        Some(0),
        &tf,
        &RecordingReporter::default(),
    )
    .await
    .expect_err("zero parallelism");
    assert!(err.to_string().contains("parallelism"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_suite_terraform_bin_override_is_used() {
    let runner = MockCommandRunner::new();
    let tf = mock_terraform(&runner);
    let mut suite = suite(&["dev"]);
    suite.settings.terraform_bin = Some("tofu".to_string());

    run_suite(&suite, &settings(), None, &tf, &RecordingReporter::default())
        .await
        .expect("valid suite");

    assert!(runner.calls().iter().all(|c| c.program == "tofu"));
}

#[tokio::test]
async fn test_invalid_expectation_pattern_is_rejected() {
    let runner = MockCommandRunner::new();
    let tf = mock_terraform(&runner);
    let mut suite = suite(&["dev"]);
    suite.scenarios[0] = suite.scenarios[0].clone().check(OutputCheck::new(
        "vpc_id",
        vec![Expectation::Matches("vpc-[".to_string())],
    ));

    let err = run_suite(&suite, &settings(), None, &tf, &RecordingReporter::default())
        .await
        .expect_err("bad regex");
    assert!(matches!(
        err.downcast_ref::<SuiteError>(),
        Some(SuiteError::InvalidPattern { .. })
    ));
}

#[tokio::test]
async fn test_validate_suite_collects_invalid_targets() {
    let runner = MockCommandRunner::new().on(
        "-chdir=/t/staging validate",
        err_output(1, b"Error: Reference to undeclared input variable"),
    );
    let tf = mock_terraform(&runner);
    let reporter = RecordingReporter::default();

    let failures = validate_suite(&suite(&["dev", "staging"]), &settings(), &tf, &reporter)
        .await
        .expect("valid suite");

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "staging");
    assert!(failures[0].1.contains("undeclared input variable"));
    assert!(!runner.subcommands().iter().any(|s| s == "apply"));
    let messages = reporter.messages();
    assert!(messages.contains(&"success: dev: valid".to_string()));
    assert!(messages.contains(&"warn: staging: invalid".to_string()));
}
