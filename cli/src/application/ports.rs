//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{HarnessSettings, Suite, TerraformOptions};

// ── Value Types ───────────────────────────────────────────────────────────────

/// A fully described external command: program, arguments and extra env.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            env: Vec::new(),
        }
    }

    #[must_use]
    pub fn envs<'a>(mut self, vars: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Human-readable command line for logs and error context.
    #[must_use]
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, cmd: &CommandSpec) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(&self, cmd: &CommandSpec, timeout: Duration) -> Result<Output>;
    /// Run a program to completion on the calling thread.
    ///
    /// Only used where no executor can be awaited, i.e. teardown from `Drop`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or outlives the
    /// runner's default timeout; the child is killed in that case.
    fn run_blocking(&self, cmd: &CommandSpec) -> Result<Output>;
}

// ── Provisioning Port Traits ──────────────────────────────────────────────────

/// Lifecycle operations on one provisioning target. Each call is exactly one
/// tool invocation; success is judged by the caller from the exit status.
#[allow(async_fn_in_trait)]
pub trait Provisioner {
    /// Initialize the working directory (providers, modules, backend).
    async fn init(&self, opts: &TerraformOptions) -> Result<Output>;
    /// Converge live infrastructure onto the definitions.
    async fn apply(&self, opts: &TerraformOptions) -> Result<Output>;
    /// Compute a plan; exit code 2 means changes are pending.
    async fn plan(&self, opts: &TerraformOptions) -> Result<Output>;
    /// Check the definitions without touching infrastructure.
    async fn validate(&self, opts: &TerraformOptions) -> Result<Output>;
    /// Destroy everything the target manages.
    async fn destroy(&self, opts: &TerraformOptions) -> Result<Output>;
    /// Destroy on the calling thread, for teardown from `Drop`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn destroy_blocking(&self, opts: &TerraformOptions) -> Result<Output>;
}

/// Reads outputs of a converged target.
#[allow(async_fn_in_trait)]
pub trait OutputReader {
    /// `output -json <name>`.
    async fn output_json(&self, opts: &TerraformOptions, name: &str) -> Result<Output>;
    /// `output -json` for every output.
    async fn output_all_json(&self, opts: &TerraformOptions) -> Result<Output>;
}

/// Composite trait — any type implementing both sub-traits is a `Terraform`.
pub trait Terraform: Provisioner + OutputReader {}

/// Blanket implementation: any type implementing both sub-traits is a `Terraform`.
impl<T> Terraform for T where T: Provisioner + OutputReader {}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Ports ───────────────────────────────────────────────────────

/// Loads suite definitions.
pub trait SuiteStore {
    /// Load, resolve and return the suite at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load(&self, path: &Path) -> Result<Suite>;
}

/// Loads process-wide harness settings.
pub trait SettingsSource {
    /// # Errors
    ///
    /// Returns an error if a present setting cannot be parsed.
    fn load(&self) -> Result<HarnessSettings>;
}
