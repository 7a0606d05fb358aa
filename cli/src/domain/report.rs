//! Results of running scenarios and suites.
//!
//! Pure data — no I/O, no async, no filesystem access.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::assertion::AssertionFailure;

/// How the scenario body ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Applied and every check held.
    Passed,
    /// Applied, but at least one check failed.
    Failed { failures: Vec<AssertionFailure> },
    /// Provisioning or output reading failed.
    Errored { error: String },
}

/// How teardown ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Teardown {
    Destroyed,
    Failed { error: String },
    /// Nothing was scheduled, e.g. the options were rejected up front.
    Skipped,
}

/// Result of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub outcome: Outcome,
    pub teardown: Teardown,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
}

impl ScenarioReport {
    /// Passed checks and did not leak resources.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed && !matches!(self.teardown, Teardown::Failed { .. })
    }
}

/// Result of a suite run, scenarios in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub scenarios: Vec<ScenarioReport>,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
}

impl SuiteReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioReport::passed)
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed()).count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.scenarios.len() - self.passed_count()
    }
}
