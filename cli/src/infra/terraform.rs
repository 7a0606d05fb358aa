//! Infrastructure implementation of the provisioning port traits.
//!
//! `TerraformCli<R>` routes every Terraform invocation through a
//! `CommandRunner`. Argument vectors come from `TerraformOptions`; this
//! adapter only attaches the program, the environment and error context.

use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, CommandSpec, OutputReader, Provisioner};
use crate::domain::TerraformOptions;
use crate::infra::command_runner::TokioCommandRunner;

/// Non-interactive mode for every invocation.
const AUTOMATION_ENV: &[(&str, &str)] = &[("TF_IN_AUTOMATION", "1"), ("TF_INPUT", "0")];

/// Infrastructure adapter that routes all Terraform CLI calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct TerraformCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> TerraformCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl TerraformCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(TokioCommandRunner::new(timeout))
    }
}

/// Build the command for `args` with the automation env and the caller's env.
#[must_use]
pub fn command(opts: &TerraformOptions, args: Vec<String>) -> CommandSpec {
    let mut cmd = CommandSpec::new(opts.terraform_binary.clone(), args);
    cmd.env.extend(
        AUTOMATION_ENV
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
    );
    cmd.envs(&opts.env_vars)
}

impl<R: CommandRunner> Provisioner for TerraformCli<R> {
    async fn init(&self, opts: &TerraformOptions) -> Result<Output> {
        self.runner
            .run(&command(opts, opts.init_args()))
            .await
            .context("terraform init")
    }

    async fn apply(&self, opts: &TerraformOptions) -> Result<Output> {
        self.runner
            .run(&command(opts, opts.apply_args()))
            .await
            .context("terraform apply")
    }

    async fn plan(&self, opts: &TerraformOptions) -> Result<Output> {
        self.runner
            .run(&command(opts, opts.plan_args()))
            .await
            .context("terraform plan")
    }

    async fn validate(&self, opts: &TerraformOptions) -> Result<Output> {
        self.runner
            .run(&command(opts, opts.validate_args()))
            .await
            .context("terraform validate")
    }

    async fn destroy(&self, opts: &TerraformOptions) -> Result<Output> {
        self.runner
            .run(&command(opts, opts.destroy_args()))
            .await
            .context("terraform destroy")
    }

    fn destroy_blocking(&self, opts: &TerraformOptions) -> Result<Output> {
        self.runner
            .run_blocking(&command(opts, opts.destroy_args()))
            .context("terraform destroy")
    }
}

impl<R: CommandRunner> OutputReader for TerraformCli<R> {
    async fn output_json(&self, opts: &TerraformOptions, name: &str) -> Result<Output> {
        self.runner
            .run(&command(opts, opts.output_args(name)))
            .await
            .with_context(|| format!("terraform output {name}"))
    }

    async fn output_all_json(&self, opts: &TerraformOptions) -> Result<Output> {
        self.runner
            .run(&command(opts, opts.output_all_args()))
            .await
            .context("terraform output")
    }
}
