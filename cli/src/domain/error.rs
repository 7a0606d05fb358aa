//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Terraform errors ──────────────────────────────────────────────────────────

/// Errors raised while driving the provisioning tool.
#[derive(Debug, Error)]
pub enum TerraformError {
    #[error("terraform {subcommand} failed (exit code {code}):\n{stderr}")]
    CommandFailed {
        subcommand: String,
        code: String,
        stderr: String,
    },

    #[error("terraform {subcommand} failed after {attempts} attempts ({reason}):\n{last_error}")]
    RetriesExhausted {
        subcommand: String,
        attempts: u32,
        reason: String,
        last_error: String,
    },

    #[error("invalid retryable error pattern '{pattern}': {reason}")]
    InvalidRetryPattern { pattern: String, reason: String },

    #[error("cannot parse output '{name}': {reason}")]
    OutputParse { name: String, reason: String },
}

// ── Output errors ─────────────────────────────────────────────────────────────

/// Errors related to reading a typed value out of an output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutputError {
    #[error("output '{name}' is a {actual}, expected a {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("output '{0}' not found")]
    NotFound(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to harness settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

// ── Suite errors ──────────────────────────────────────────────────────────────

/// Errors found while validating a suite definition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuiteError {
    #[error("suite has no scenarios")]
    Empty,

    #[error("scenario #{0} has an empty name")]
    EmptyName(usize),

    #[error("duplicate scenario name '{0}'")]
    DuplicateName(String),

    #[error("scenarios '{first}' and '{second}' share terraform_dir '{dir}'")]
    SharedTarget {
        first: String,
        second: String,
        dir: String,
    },

    #[error("scenario '{scenario}' has an invalid pattern for output '{output}': {reason}")]
    InvalidPattern {
        scenario: String,
        output: String,
        reason: String,
    },

    #[error("invalid retryable error pattern '{pattern}' in suite settings: {reason}")]
    InvalidRetryPattern { pattern: String, reason: String },

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
}
