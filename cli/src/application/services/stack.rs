//! Stack lifecycle: init, apply, read outputs, destroy.
//!
//! A `Stack` is created before anything is applied and owns the teardown of
//! its target. `destroy` should be awaited; if the stack is dropped without
//! it (early return, `?`, panicking assertion) the target is destroyed
//! synchronously from `Drop`.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::collections::BTreeMap;
use std::future::Future;
use std::process::Output;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::application::ports::{Provisioner, Terraform};
use crate::domain::{OutputValue, Outputs, RetryPolicy, TerraformError, TerraformOptions};

/// Exit code of `plan -detailed-exitcode` when changes are pending.
pub const PLAN_CHANGES_PENDING: i32 = 2;

// ── Retry ─────────────────────────────────────────────────────────────────────

/// What to do with the output of one attempt.
enum Step {
    Done(Output),
    Retry(String),
    Fail(TerraformError),
}

fn evaluate(policy: &RetryPolicy, subcommand: &str, attempt: u32, output: Output) -> Step {
    if output.status.success() {
        return Step::Done(output);
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let last_error = failure_text(&stdout, &stderr);
    match policy.classify(&stdout, &stderr) {
        Some(reason) if attempt < policy.max_attempts() => Step::Retry(reason.to_string()),
        Some(reason) => Step::Fail(TerraformError::RetriesExhausted {
            subcommand: subcommand.to_string(),
            attempts: attempt,
            reason: reason.to_string(),
            last_error,
        }),
        None => Step::Fail(TerraformError::CommandFailed {
            subcommand: subcommand.to_string(),
            code: exit_code(&output),
            stderr: last_error,
        }),
    }
}

/// Run one tool invocation, retrying while the failure matches the policy.
///
/// Spawn failures and timeouts are returned immediately; only failures
/// reported by the tool itself are classified.
///
/// # Errors
///
/// Returns `TerraformError::CommandFailed` for a non-retryable failure and
/// `TerraformError::RetriesExhausted` once the budget is spent.
pub async fn with_retry<F, Fut>(policy: &RetryPolicy, subcommand: &str, mut op: F) -> Result<Output>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Output>>,
{
    let mut attempt = 1;
    loop {
        let output = op().await?;
        match evaluate(policy, subcommand, attempt, output) {
            Step::Done(output) => {
                info!(subcommand, attempt, "terraform {subcommand} succeeded");
                return Ok(output);
            }
            Step::Retry(reason) => {
                warn!(
                    subcommand,
                    attempt,
                    reason = %reason,
                    "terraform {subcommand} failed with a retryable error, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Step::Fail(e) => return Err(e.into()),
        }
    }
}

/// Blocking twin of [`with_retry`], used from `Drop`.
fn with_retry_blocking<F>(policy: &RetryPolicy, subcommand: &str, mut op: F) -> Result<Output>
where
    F: FnMut() -> Result<Output>,
{
    let mut attempt = 1;
    loop {
        match evaluate(policy, subcommand, attempt, op()?) {
            Step::Done(output) => return Ok(output),
            Step::Retry(reason) => {
                warn!(subcommand, attempt, reason = %reason, "retrying blocking {subcommand}");
                std::thread::sleep(policy.delay);
                attempt += 1;
            }
            Step::Fail(e) => return Err(e.into()),
        }
    }
}

/// Judge a command that is never retried.
fn require_success(subcommand: &str, output: Output) -> Result<Output, TerraformError> {
    if output.status.success() {
        return Ok(output);
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(TerraformError::CommandFailed {
        subcommand: subcommand.to_string(),
        code: exit_code(&output),
        stderr: failure_text(&stdout, &stderr),
    })
}

fn failure_text(stdout: &str, stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.to_string()
    }
}

fn exit_code(output: &Output) -> String {
    output
        .status
        .code()
        .map_or_else(|| "signal".to_string(), |c| c.to_string())
}

// ── Validate (no teardown needed) ─────────────────────────────────────────────

/// Run `init` then `validate` against a target. Nothing is provisioned.
///
/// # Errors
///
/// Returns an error if either command fails.
pub async fn init_and_validate(tf: &impl Provisioner, opts: &TerraformOptions) -> Result<()> {
    let policy = RetryPolicy::from_options(opts)?;
    with_retry(&policy, "init", || tf.init(opts)).await?;
    let output = tf.validate(opts).await.context("terraform validate")?;
    require_success("validate", output)?;
    info!(target_dir = %opts.terraform_dir.display(), "definitions are valid");
    Ok(())
}

// ── Stack ─────────────────────────────────────────────────────────────────────

/// Handle on one provisioning target whose teardown is already scheduled.
pub struct Stack<'a, T: Terraform> {
    tf: &'a T,
    opts: TerraformOptions,
    policy: RetryPolicy,
    armed: bool,
}

impl<'a, T: Terraform> Stack<'a, T> {
    /// Schedule teardown for `opts`. Nothing runs until `init_and_apply`.
    ///
    /// # Errors
    ///
    /// Returns an error if the retryable error catalogue does not compile.
    pub fn new(tf: &'a T, opts: TerraformOptions) -> Result<Self> {
        let policy = RetryPolicy::from_options(&opts)?;
        Ok(Self {
            tf,
            opts,
            policy,
            armed: true,
        })
    }

    #[must_use]
    pub fn options(&self) -> &TerraformOptions {
        &self.opts
    }

    /// `init` followed by `apply`, each retried on known transient errors.
    ///
    /// # Errors
    ///
    /// Returns an error if either command fails. Teardown stays scheduled.
    pub async fn init_and_apply(&self) -> Result<()> {
        let dir = self.opts.terraform_dir.display().to_string();
        info!(target_dir = %dir, "initializing");
        with_retry(&self.policy, "init", || self.tf.init(&self.opts)).await?;
        info!(target_dir = %dir, "applying");
        with_retry(&self.policy, "apply", || self.tf.apply(&self.opts)).await?;
        Ok(())
    }

    /// Run `plan -detailed-exitcode` and return its exit code (0 or 2).
    ///
    /// # Errors
    ///
    /// Returns an error if the plan itself fails (exit code 1).
    pub async fn plan_exit_code(&self) -> Result<i32> {
        let output = self.tf.plan(&self.opts).await.context("terraform plan")?;
        match output.status.code() {
            Some(PLAN_CHANGES_PENDING) => Ok(PLAN_CHANGES_PENDING),
            _ => {
                require_success("plan", output)?;
                Ok(0)
            }
        }
    }

    /// Read one output as a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the output does not exist or is not valid JSON.
    pub async fn output_value(&self, name: &str) -> Result<OutputValue> {
        let output = self
            .tf
            .output_json(&self.opts, name)
            .await
            .with_context(|| format!("terraform output {name}"))?;
        let output = require_success("output", output)?;
        debug!(name, "output read");
        Ok(OutputValue::parse(name, &output.stdout)?)
    }

    /// Read one output as a string.
    ///
    /// # Errors
    ///
    /// See [`Stack::output_value`].
    pub async fn output(&self, name: &str) -> Result<String> {
        Ok(self.output_value(name).await?.as_string())
    }

    /// Read one output as a list of strings.
    ///
    /// # Errors
    ///
    /// Also fails when the output is not a list of scalars.
    pub async fn output_list(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.output_value(name).await?.as_list()?)
    }

    /// Read one output as a map of strings.
    ///
    /// # Errors
    ///
    /// Also fails when the output is not a map of scalars.
    pub async fn output_map(&self, name: &str) -> Result<BTreeMap<String, String>> {
        Ok(self.output_value(name).await?.as_map()?)
    }

    /// Read every output in one invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or prints unexpected JSON.
    pub async fn outputs(&self) -> Result<Outputs> {
        let output = self
            .tf
            .output_all_json(&self.opts)
            .await
            .context("terraform output")?;
        let output = require_success("output", output)?;
        Ok(Outputs::parse(&output.stdout)?)
    }

    /// Destroy the target and cancel the drop-time teardown.
    ///
    /// # Errors
    ///
    /// Returns an error if destroy fails after retries.
    pub async fn destroy(mut self) -> Result<()> {
        self.armed = false;
        info!(target_dir = %self.opts.terraform_dir.display(), "destroying");
        with_retry(&self.policy, "destroy", || self.tf.destroy(&self.opts)).await?;
        Ok(())
    }
}

impl<T: Terraform> Drop for Stack<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let dir = self.opts.terraform_dir.display().to_string();
        warn!(target_dir = %dir, "stack dropped without destroy, tearing down");
        match with_retry_blocking(&self.policy, "destroy", || {
            self.tf.destroy_blocking(&self.opts)
        }) {
            Ok(_) => info!(target_dir = %dir, "teardown complete"),
            Err(e) => error!(target_dir = %dir, error = %format!("{e:#}"), "teardown failed"),
        }
    }
}
