//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;
use crate::infra::config::{EnvSettings, YamlSuiteStore};

/// Integration tests for Terraform-provisioned infrastructure
#[derive(Parser)]
#[command(
    name = "infratest",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (a non-empty NO_COLOR does the same)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log Terraform invocations to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision every scenario, check its outputs, then destroy it
    Run(commands::run::RunArgs),

    /// Parse and validate a suite file without running Terraform
    Check(commands::SuiteArgs),

    /// Run `terraform init` and `terraform validate` for every scenario
    Validate(commands::SuiteArgs),

    /// List the scenarios of a suite
    List(commands::SuiteArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let flags = OutputFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            json: self.json,
        };
        let app = AppContext::new(&flags, &EnvSettings)?;
        let store = YamlSuiteStore;

        match self.command {
            Command::Run(args) => commands::run::run(&app, &args, &store).await,
            Command::Check(args) => commands::check::run(&app, &args, &store),
            Command::Validate(args) => commands::validate::run(&app, &args, &store).await,
            Command::List(args) => commands::list::run(&app, &args, &store),
            Command::Version => Ok(commands::version::run(&app)),
        }
    }
}
