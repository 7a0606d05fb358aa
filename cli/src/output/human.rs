//! Human-readable terminal renderer.

use crate::domain::{Outcome, Scenario, ScenarioReport, Suite, SuiteReport, Teardown};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        self.ctx.info(&format!("infratest v{version}"));
    }

    /// Render the scenarios of a suite without running anything.
    pub fn render_suite(&self, suite: &Suite) {
        self.ctx.header(&format!("Suite {}", suite.name));
        for scenario in &suite.scenarios {
            self.ctx
                .kv(&format!("{}:", scenario.name), &scenario_summary(scenario));
        }
    }

    /// Render the outcome of a suite run.
    pub fn render_report(&self, report: &SuiteReport) {
        println!();
        self.ctx.header(&format!("Suite {}", report.suite));
        for scenario in &report.scenarios {
            self.render_scenario(scenario);
        }
        println!();
        let summary = format!(
            "{} passed, {} failed ({:.1}s)",
            report.passed_count(),
            report.failed_count(),
            report.duration_secs
        );
        if report.passed() {
            self.ctx.success(&summary);
        } else {
            self.ctx.failure(&summary);
        }
    }

    fn render_scenario(&self, report: &ScenarioReport) {
        let line = format!("{} ({:.1}s)", report.name, report.duration_secs);
        if report.passed() {
            self.ctx.success(&line);
        } else {
            self.ctx.failure(&line);
        }
        match &report.outcome {
            Outcome::Passed => {}
            Outcome::Failed { failures } => {
                for failure in failures {
                    self.ctx.detail(&failure.to_string());
                }
            }
            Outcome::Errored { error } => {
                for line in error.lines().take(20) {
                    self.ctx.detail(line);
                }
            }
        }
        if let Teardown::Failed { error } = &report.teardown {
            self.ctx.warn(&format!("{}: teardown failed", report.name));
            for line in error.lines().take(20) {
                self.ctx.detail(line);
            }
        }
    }

    /// Render the result of `validate` for every target.
    pub fn render_validation(&self, suite: &Suite, failures: &[(String, String)]) {
        println!();
        if failures.is_empty() {
            self.ctx.success(&format!(
                "{} targets valid in suite {}",
                suite.scenarios.len(),
                suite.name
            ));
            return;
        }
        for (name, error) in failures {
            self.ctx.failure(name);
            for line in error.lines().take(20) {
                self.ctx.detail(line);
            }
        }
    }
}

fn scenario_summary(scenario: &Scenario) -> String {
    let checks: usize = scenario.checks.iter().map(|c| c.expect.len()).sum();
    format!(
        "{}  ({} vars, {} var files, {} checks)",
        scenario.terraform_dir.display(),
        scenario.vars.len(),
        scenario.var_files.len(),
        checks
    )
}
