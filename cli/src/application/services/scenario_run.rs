//! Application service — run one scenario end to end.
//!
//! apply → read outputs → check → destroy. Destroy is attempted on every
//! path once the stack exists, whatever happened before it.

use std::time::Instant;

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::{ProgressReporter, Terraform};
use crate::application::services::stack::{PLAN_CHANGES_PENDING, Stack};
use crate::domain::{
    AssertionFailure, HarnessSettings, Outcome, Scenario, ScenarioReport, SuiteSettings, Teardown,
};

/// Run `scenario` and report how its body and its teardown ended.
pub async fn run_scenario(
    scenario: &Scenario,
    settings: &HarnessSettings,
    suite: &SuiteSettings,
    tf: &impl Terraform,
    reporter: &impl ProgressReporter,
) -> ScenarioReport {
    let started_at = Utc::now();
    let clock = Instant::now();
    let name = scenario.name.as_str();

    let (outcome, teardown) = match Stack::new(tf, scenario.options(settings, suite)) {
        Ok(stack) => {
            reporter.step(&format!("{name}: applying"));
            let outcome = match exercise(&stack, scenario).await {
                Ok(failures) if failures.is_empty() => Outcome::Passed,
                Ok(failures) => Outcome::Failed { failures },
                Err(e) => Outcome::Errored {
                    error: format!("{e:#}"),
                },
            };
            reporter.step(&format!("{name}: destroying"));
            let teardown = match stack.destroy().await {
                Ok(()) => Teardown::Destroyed,
                Err(e) => {
                    reporter.warn(&format!("{name}: teardown failed, resources may leak"));
                    Teardown::Failed {
                        error: format!("{e:#}"),
                    }
                }
            };
            (outcome, teardown)
        }
        Err(e) => (
            Outcome::Errored {
                error: format!("{e:#}"),
            },
            Teardown::Skipped,
        ),
    };

    let report = ScenarioReport {
        name: name.to_string(),
        outcome,
        teardown,
        started_at,
        duration_secs: clock.elapsed().as_secs_f64(),
    };
    if report.passed() {
        reporter.success(&format!("{name}: passed"));
    } else {
        reporter.warn(&format!("{name}: failed"));
    }
    report
}

/// Apply, then evaluate every check. Provisioning errors abort; check
/// failures are collected.
async fn exercise<T: Terraform>(
    stack: &Stack<'_, T>,
    scenario: &Scenario,
) -> Result<Vec<AssertionFailure>> {
    stack.init_and_apply().await?;

    let mut failures = Vec::new();
    if scenario.check_idempotent {
        let code = stack.plan_exit_code().await?;
        if code == PLAN_CHANGES_PENDING {
            failures.push(AssertionFailure {
                output: "<plan>".to_string(),
                expected: "report no changes after apply".to_string(),
                actual: "pending changes".to_string(),
            });
        }
    }

    if scenario.checks.is_empty() {
        return Ok(failures);
    }
    let outputs = stack.outputs().await?;
    for check in &scenario.checks {
        match outputs.get(&check.output) {
            Ok(value) => failures.extend(check.evaluate(value)),
            Err(e) => failures.push(AssertionFailure {
                output: check.output.clone(),
                expected: "exist".to_string(),
                actual: e.to_string(),
            }),
        }
    }
    Ok(failures)
}
