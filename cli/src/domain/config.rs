//! Domain types and validators for harness configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::options::{DEFAULT_TERRAFORM_BINARY, TerraformOptions};

// ── Constants ────────────────────────────────────────────────────────────────

/// Environment variable prefix read by the settings loader.
pub const ENV_PREFIX: &str = "INFRATEST_";

/// Applies and destroys of real cloud targets can take a long time.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60 * 60;

// ── Harness settings ─────────────────────────────────────────────────────────

/// Process-wide settings, loaded from `INFRATEST_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessSettings {
    /// Program spawned for every command.
    #[serde(default = "default_terraform_bin")]
    pub terraform_bin: String,

    /// Upper bound for a single command before the child is killed.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Overrides the retry budget of every scenario when set.
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Overrides the pause between retries when set.
    #[serde(default)]
    pub retry_delay_secs: Option<u64>,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            terraform_bin: default_terraform_bin(),
            command_timeout_secs: default_command_timeout_secs(),
            max_retries: None,
            retry_delay_secs: None,
        }
    }
}

fn default_terraform_bin() -> String {
    DEFAULT_TERRAFORM_BINARY.to_string()
}

fn default_command_timeout_secs() -> u64 {
    DEFAULT_COMMAND_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

impl HarnessSettings {
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Apply suite-level overrides on top of these settings.
    #[must_use]
    pub fn overlay(&self, suite: &SuiteSettings) -> Self {
        Self {
            terraform_bin: suite
                .terraform_bin
                .clone()
                .unwrap_or_else(|| self.terraform_bin.clone()),
            command_timeout_secs: suite
                .command_timeout_secs
                .unwrap_or(self.command_timeout_secs),
            max_retries: suite.max_retries.or(self.max_retries),
            retry_delay_secs: suite.retry_delay_secs.or(self.retry_delay_secs),
        }
    }

    /// Apply the retry budget overrides to an options record.
    #[must_use]
    pub fn apply_retry_overrides(&self, mut opts: TerraformOptions) -> TerraformOptions {
        if let Some(n) = self.max_retries {
            opts.max_retries = n;
        }
        if let Some(secs) = self.retry_delay_secs {
            opts.time_between_retries = Duration::from_secs(secs);
        }
        opts
    }
}

// ── Suite settings ───────────────────────────────────────────────────────────

/// Per-suite settings from the `settings:` block of a suite file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteSettings {
    pub terraform_bin: Option<String>,
    pub command_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_secs: Option<u64>,
    /// Upper bound on concurrently running scenarios.
    pub parallelism: Option<usize>,
    /// Include the default transient-error catalogue.
    #[serde(default = "default_true")]
    pub default_retryable_errors: bool,
    /// Extra retryable patterns, `regex -> description`.
    pub retryable_errors: BTreeMap<String, String>,
}

impl Default for SuiteSettings {
    fn default() -> Self {
        Self {
            terraform_bin: None,
            command_timeout_secs: None,
            max_retries: None,
            retry_delay_secs: None,
            parallelism: None,
            default_retryable_errors: true,
            retryable_errors: BTreeMap::new(),
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates harness settings after all overlays were applied.
///
/// # Errors
///
/// Returns an error if a value can never produce a working run.
pub fn validate_settings(settings: &HarnessSettings) -> Result<()> {
    if settings.terraform_bin.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "terraform_bin".to_string(),
            value: settings.terraform_bin.clone(),
            reason: "must not be empty".to_string(),
        }
        .into());
    }
    if settings.command_timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: "command_timeout_secs".to_string(),
            value: "0".to_string(),
            reason: "must be greater than zero".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Validates a requested scenario parallelism.
///
/// # Errors
///
/// Returns an error if `parallelism` is zero.
pub fn validate_parallelism(parallelism: usize) -> Result<()> {
    if parallelism == 0 {
        return Err(ConfigError::InvalidValue {
            key: "parallelism".to_string(),
            value: "0".to_string(),
            reason: "must be greater than zero".to_string(),
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
