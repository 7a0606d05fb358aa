//! `infratest list` — show the scenarios declared in a suite.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::SuiteStore;
use crate::commands::SuiteArgs;
use crate::output::{HumanRenderer, json};

/// Run `infratest list`.
///
/// # Errors
///
/// Returns an error if the suite cannot be loaded or is invalid.
pub fn run(app: &AppContext, args: &SuiteArgs, store: &impl SuiteStore) -> Result<ExitCode> {
    let suite = args.load(store)?;
    if app.is_json() {
        println!("{}", json::format(&suite)?);
    } else {
        HumanRenderer::new(&app.output).render_suite(&suite);
    }
    Ok(ExitCode::SUCCESS)
}
