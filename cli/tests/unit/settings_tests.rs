//! Unit tests for settings loading and suite-level overrides.

#![allow(clippy::expect_used)]

use std::time::Duration;

use infratest::domain::config::DEFAULT_COMMAND_TIMEOUT_SECS;
use infratest::domain::{HarnessSettings, Scenario, SuiteSettings};
use infratest::infra::config::settings_from_vars;

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn test_defaults_when_nothing_is_set() {
    let settings = settings_from_vars(vars(&[("PATH", "/usr/bin")])).expect("defaults");
    assert_eq!(settings, HarnessSettings::default());
    assert_eq!(settings.terraform_bin, "terraform");
    assert_eq!(settings.command_timeout_secs, DEFAULT_COMMAND_TIMEOUT_SECS);
}

#[test]
fn test_prefixed_variables_are_read() {
    let settings = settings_from_vars(vars(&[
        ("INFRATEST_TERRAFORM_BIN", "/opt/terraform/1.9/terraform"),
        ("INFRATEST_COMMAND_TIMEOUT_SECS", "900"),
        ("INFRATEST_MAX_RETRIES", "5"),
        ("INFRATEST_RETRY_DELAY_SECS", "10"),
    ]))
    .expect("parse");
    assert_eq!(settings.terraform_bin, "/opt/terraform/1.9/terraform");
    assert_eq!(settings.command_timeout(), Duration::from_secs(900));
    assert_eq!(settings.max_retries, Some(5));
    assert_eq!(settings.retry_delay_secs, Some(10));
}

#[test]
fn test_unparseable_value_is_an_error() {
    let err = settings_from_vars(vars(&[("INFRATEST_MAX_RETRIES", "many")]))
        .expect_err("not a number");
    assert!(format!("{err:#}").contains("INFRATEST_"));
}

#[test]
fn test_suite_settings_override_environment() {
    let env = settings_from_vars(vars(&[
        ("INFRATEST_MAX_RETRIES", "5"),
        ("INFRATEST_RETRY_DELAY_SECS", "10"),
    ]))
    .expect("parse");
    let suite = SuiteSettings {
        max_retries: Some(1),
        terraform_bin: Some("tofu".to_string()),
        ..SuiteSettings::default()
    };
    let merged = env.overlay(&suite);
    assert_eq!(merged.max_retries, Some(1));
    assert_eq!(merged.retry_delay_secs, Some(10));
    assert_eq!(merged.terraform_bin, "tofu");
}

#[test]
fn test_retry_overrides_reach_scenario_options() {
    let settings = settings_from_vars(vars(&[
        ("INFRATEST_MAX_RETRIES", "7"),
        ("INFRATEST_RETRY_DELAY_SECS", "0"),
    ]))
    .expect("parse");
    let opts = Scenario::new("dev", "/t/dev").options(&settings, &SuiteSettings::default());
    assert_eq!(opts.max_retries, 7);
    assert_eq!(opts.time_between_retries, Duration::ZERO);
    assert!(!opts.retryable_errors.is_empty());
}

#[test]
fn test_scenario_without_default_catalogue_has_no_retries() {
    let suite = SuiteSettings {
        default_retryable_errors: false,
        ..SuiteSettings::default()
    };
    let opts = Scenario::new("dev", "/t/dev").options(&HarnessSettings::default(), &suite);
    assert!(opts.retryable_errors.is_empty());
    assert_eq!(opts.max_retries, 0);
}
