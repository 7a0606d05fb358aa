//! `infratest validate` — `terraform init` + `terraform validate` per target.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::SuiteStore;
use crate::application::services::suite_run::validate_suite;
use crate::commands::SuiteArgs;
use crate::output::{HumanRenderer, TerminalReporter, json};

/// Run `infratest validate`.
///
/// # Errors
///
/// Returns an error if the suite cannot be loaded or is invalid.
pub async fn run(app: &AppContext, args: &SuiteArgs, store: &impl SuiteStore) -> Result<ExitCode> {
    let suite = args.load(store)?;
    let tf = app.terraform(&suite.settings);
    let reporter = TerminalReporter::new(&app.output);
    let failures = validate_suite(&suite, &app.settings, &tf, &reporter).await?;

    if app.is_json() {
        let invalid: Vec<_> = failures
            .iter()
            .map(|(name, error)| serde_json::json!({ "scenario": name, "error": error }))
            .collect();
        let doc = serde_json::json!({
            "suite": suite.name,
            "valid": failures.is_empty(),
            "invalid": invalid,
        });
        println!("{}", json::format(&doc)?);
    } else {
        HumanRenderer::new(&app.output).render_validation(&suite, &failures);
    }

    Ok(if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
