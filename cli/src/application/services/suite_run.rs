//! Application service — run every scenario of a suite concurrently.
//!
//! Scenarios share nothing but the read-only settings and the adapter, so
//! they run as independent futures; the report keeps declaration order.

use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use futures_util::StreamExt as _;
use futures_util::stream;
use tracing::info;

use crate::application::ports::{ProgressReporter, Terraform};
use crate::application::services::scenario_run::run_scenario;
use crate::application::services::stack::init_and_validate;
use crate::domain::config::{validate_parallelism, validate_settings};
use crate::domain::{HarnessSettings, Suite, SuiteReport};

/// Run `suite` with at most `parallelism` scenarios in flight.
///
/// `parallelism` falls back to the suite setting, then to one slot per
/// scenario.
///
/// # Errors
///
/// Returns an error if the suite or the merged settings are invalid.
/// Scenario failures are reported in the returned `SuiteReport`, not here.
pub async fn run_suite(
    suite: &Suite,
    settings: &HarnessSettings,
    parallelism: Option<usize>,
    tf: &impl Terraform,
    reporter: &impl ProgressReporter,
) -> Result<SuiteReport> {
    suite.validate()?;
    let settings = settings.overlay(&suite.settings);
    validate_settings(&settings)?;
    let limit = match parallelism.or(suite.settings.parallelism) {
        Some(n) => {
            validate_parallelism(n)?;
            n
        }
        None => suite.scenarios.len(),
    };

    info!(
        suite = %suite.name,
        scenarios = suite.scenarios.len(),
        parallelism = limit,
        "running suite"
    );
    let started_at = Utc::now();
    let clock = Instant::now();

    let scenarios = stream::iter(
        suite
            .scenarios
            .iter()
            .map(|scenario| run_scenario(scenario, &settings, &suite.settings, tf, reporter)),
    )
    .buffered(limit)
    .collect::<Vec<_>>()
    .await;

    Ok(SuiteReport {
        suite: suite.name.clone(),
        scenarios,
        started_at,
        duration_secs: clock.elapsed().as_secs_f64(),
    })
}

/// Run `init` + `validate` for every scenario without provisioning anything.
///
/// Returns `(scenario name, error)` for each target that failed.
///
/// # Errors
///
/// Returns an error if the suite or the merged settings are invalid.
pub async fn validate_suite(
    suite: &Suite,
    settings: &HarnessSettings,
    tf: &impl Terraform,
    reporter: &impl ProgressReporter,
) -> Result<Vec<(String, String)>> {
    suite.validate()?;
    let settings = settings.overlay(&suite.settings);
    validate_settings(&settings)?;

    let results = stream::iter(suite.scenarios.iter().map(|scenario| {
        let opts = scenario.options(&settings, &suite.settings);
        async move {
            reporter.step(&format!("{}: validating", scenario.name));
            let result = init_and_validate(tf, &opts).await;
            (scenario.name.clone(), result)
        }
    }))
    .buffered(suite.scenarios.len().max(1))
    .collect::<Vec<_>>()
    .await;

    let mut failures = Vec::new();
    for (name, result) in results {
        match result {
            Ok(()) => reporter.success(&format!("{name}: valid")),
            Err(e) => {
                reporter.warn(&format!("{name}: invalid"));
                failures.push((name, format!("{e:#}")));
            }
        }
    }
    Ok(failures)
}
