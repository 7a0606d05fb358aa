//! Classification of tool failures as retryable or fatal.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::time::Duration;

use regex::Regex;

use crate::domain::error::TerraformError;
use crate::domain::options::TerraformOptions;

/// Compiled retry catalogue and budget for one options record.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    patterns: Vec<(Regex, String)>,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Compile the catalogue held by `opts`.
    ///
    /// # Errors
    ///
    /// Returns `TerraformError::InvalidRetryPattern` for the first pattern
    /// that is not a valid regex.
    pub fn from_options(opts: &TerraformOptions) -> Result<Self, TerraformError> {
        let patterns = opts
            .retryable_errors
            .iter()
            .map(|(pattern, description)| {
                Regex::new(pattern)
                    .map(|re| (re, description.clone()))
                    .map_err(|e| TerraformError::InvalidRetryPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            max_retries: opts.max_retries,
            delay: opts.time_between_retries,
        })
    }

    /// Total attempts allowed, first one included.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Return the description of the first pattern, in catalogue order,
    /// matching the command output, or `None` when the failure is not
    /// retryable.
    #[must_use]
    pub fn classify(&self, stdout: &str, stderr: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(re, _)| re.is_match(stdout) || re.is_match(stderr))
            .map(|(_, description)| description.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
