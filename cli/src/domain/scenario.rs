//! Scenario and suite definitions.
//!
//! Pure functions only — no I/O, no async, no filesystem access. A scenario
//! is one provisioning target plus the checks run against its outputs; a
//! suite is a set of scenarios that may run concurrently.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::assertion::OutputCheck;
use crate::domain::config::{HarnessSettings, SuiteSettings};
use crate::domain::error::SuiteError;
use crate::domain::options::{
    DEFAULT_MAX_RETRIES, DEFAULT_TIME_BETWEEN_RETRIES, TerraformOptions,
};
use crate::domain::vars::VarValue;

fn default_true() -> bool {
    true
}

/// One provisioning target and the checks run against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Target directory; relative paths resolve against the suite file.
    pub terraform_dir: PathBuf,
    #[serde(default)]
    pub vars: BTreeMap<String, VarValue>,
    /// Variable files; relative paths resolve against `terraform_dir`.
    #[serde(default)]
    pub var_files: Vec<PathBuf>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub no_color: bool,
    /// After apply, a plan must report no pending changes.
    #[serde(default)]
    pub check_idempotent: bool,
    #[serde(default)]
    pub checks: Vec<OutputCheck>,
}

impl Scenario {
    #[must_use]
    pub fn new(name: impl Into<String>, terraform_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            terraform_dir: terraform_dir.into(),
            vars: BTreeMap::new(),
            var_files: Vec::new(),
            env: BTreeMap::new(),
            no_color: true,
            check_idempotent: false,
            checks: Vec::new(),
        }
    }

    #[must_use]
    pub fn check(mut self, check: OutputCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Build the options record for this scenario.
    #[must_use]
    pub fn options(&self, settings: &HarnessSettings, suite: &SuiteSettings) -> TerraformOptions {
        let mut opts = TerraformOptions::new(&self.terraform_dir)
            .binary(settings.terraform_bin.clone())
            .no_color(self.no_color);
        opts.vars.clone_from(&self.vars);
        opts.var_files.clone_from(&self.var_files);
        opts.env_vars.clone_from(&self.env);
        for (pattern, description) in &suite.retryable_errors {
            opts = opts.retryable_error(pattern.clone(), description.clone());
        }
        if suite.default_retryable_errors {
            opts = opts.with_default_retryable_errors();
        } else if !suite.retryable_errors.is_empty() {
            opts = opts.retries(DEFAULT_MAX_RETRIES, DEFAULT_TIME_BETWEEN_RETRIES);
        }
        settings.apply_retry_overrides(opts)
    }
}

/// A named set of independent scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    #[serde(default)]
    pub settings: SuiteSettings,
    pub scenarios: Vec<Scenario>,
}

impl Suite {
    /// Resolve relative target directories against `base`.
    #[must_use]
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        for scenario in &mut self.scenarios {
            if scenario.terraform_dir.is_relative() {
                scenario.terraform_dir = normalize(&base.join(&scenario.terraform_dir));
            }
        }
        self
    }

    /// Check the suite for definitions that cannot run in isolation.
    ///
    /// # Errors
    ///
    /// Returns the first `SuiteError` found.
    pub fn validate(&self) -> Result<(), SuiteError> {
        if self.scenarios.is_empty() {
            return Err(SuiteError::Empty);
        }
        for pattern in self.settings.retryable_errors.keys() {
            Regex::new(pattern).map_err(|e| SuiteError::InvalidRetryPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }
        let mut names = HashSet::new();
        let mut targets: HashMap<PathBuf, &str> = HashMap::new();
        for (i, scenario) in self.scenarios.iter().enumerate() {
            if scenario.name.trim().is_empty() {
                return Err(SuiteError::EmptyName(i + 1));
            }
            if !names.insert(scenario.name.as_str()) {
                return Err(SuiteError::DuplicateName(scenario.name.clone()));
            }
            let dir = normalize(&scenario.terraform_dir);
            if let Some(first) = targets.insert(dir.clone(), &scenario.name) {
                return Err(SuiteError::SharedTarget {
                    first: first.to_string(),
                    second: scenario.name.clone(),
                    dir: dir.display().to_string(),
                });
            }
            for check in &scenario.checks {
                for expectation in &check.expect {
                    expectation
                        .validate()
                        .map_err(|reason| SuiteError::InvalidPattern {
                            scenario: scenario.name.clone(),
                            output: check.output.clone(),
                            reason,
                        })?;
                }
            }
        }
        Ok(())
    }

    /// Keep only the named scenarios, in suite order. An empty filter keeps all.
    ///
    /// # Errors
    ///
    /// Returns `SuiteError::UnknownScenario` for a name not in the suite.
    pub fn select(mut self, names: &[String]) -> Result<Self, SuiteError> {
        if names.is_empty() {
            return Ok(self);
        }
        if let Some(unknown) = names
            .iter()
            .find(|n| !self.scenarios.iter().any(|s| &s.name == *n))
        {
            return Err(SuiteError::UnknownScenario(unknown.clone()));
        }
        self.scenarios.retain(|s| names.contains(&s.name));
        Ok(self)
    }
}

/// Lexically normalize a path (drop `.`, fold `..`) without touching disk.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
