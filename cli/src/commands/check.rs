//! `infratest check` — parse and validate a suite without running Terraform.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::SuiteStore;
use crate::commands::SuiteArgs;
use crate::domain::config::{validate_parallelism, validate_settings};
use crate::output::json;

/// Run `infratest check`.
///
/// # Errors
///
/// Returns an error if the suite cannot be loaded or is invalid.
pub fn run(app: &AppContext, args: &SuiteArgs, store: &impl SuiteStore) -> Result<ExitCode> {
    let suite = args.load(store)?;
    validate_settings(&app.settings.overlay(&suite.settings))?;
    if let Some(n) = suite.settings.parallelism {
        validate_parallelism(n)?;
    }

    if app.is_json() {
        let doc = serde_json::json!({
            "suite": suite.name,
            "valid": true,
            "scenarios": suite.scenarios.len(),
        });
        println!("{}", json::format(&doc)?);
    } else {
        app.output.success(&format!(
            "{} is valid ({} scenarios)",
            args.suite.display(),
            suite.scenarios.len()
        ));
    }
    Ok(ExitCode::SUCCESS)
}
