//! `infratest run` — provision, assert and tear down every scenario.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{SuiteStore, Terraform};
use crate::application::services::suite_run::run_suite;
use crate::commands::SuiteArgs;
use crate::domain::Suite;
use crate::output::{HumanRenderer, TerminalReporter, json, progress};

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub suite: SuiteArgs,

    /// Only run the named scenario (repeatable)
    #[arg(short, long = "scenario", value_name = "NAME")]
    pub scenarios: Vec<String>,

    /// Maximum number of scenarios in flight
    #[arg(short, long, value_name = "N")]
    pub parallel: Option<usize>,
}

/// Run `infratest run` with the production Terraform adapter.
///
/// # Errors
///
/// Returns an error if the suite cannot be loaded, selected, or is invalid.
pub async fn run(app: &AppContext, args: &RunArgs, store: &impl SuiteStore) -> Result<ExitCode> {
    let suite = args.suite.load(store)?.select(&args.scenarios)?;
    let tf = app.terraform(&suite.settings);
    execute(app, &suite, args.parallel, &tf).await
}

/// Run an already loaded suite against any Terraform adapter and render the
/// report.
///
/// # Errors
///
/// Returns an error if the suite or its settings are invalid.
pub async fn execute(
    app: &AppContext,
    suite: &Suite,
    parallel: Option<usize>,
    tf: &impl Terraform,
) -> Result<ExitCode> {
    let ctx = &app.output;

    ctx.header(&format!(
        "Running suite {} ({} scenarios)",
        suite.name,
        suite.scenarios.len()
    ));
    let mut reporter = TerminalReporter::new(ctx);
    if ctx.show_progress() {
        reporter = reporter.with_spinner(progress::spinner("provisioning..."));
    }
    let result = run_suite(suite, &app.settings, parallel, tf, &reporter).await;
    reporter.finish();
    let report = result?;

    if app.is_json() {
        println!("{}", json::format(&report)?);
    } else {
        HumanRenderer::new(ctx).render_report(&report);
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
