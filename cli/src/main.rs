//! infratest - integration tests for Terraform-provisioned infrastructure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use infratest::cli::Cli;
use infratest::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries reports; logs go to stderr.
    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let json_mode = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json_mode {
                if let Ok(doc) = json::format_error(&format!("{e:#}"), "COMMAND_FAILED") {
                    println!("{doc}");
                }
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
