//! Application context — state shared by every command handler.

use anyhow::Result;

use crate::application::ports::SettingsSource;
use crate::domain::{HarnessSettings, SuiteSettings};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::terraform::TerraformCli;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags passed from the top-level CLI.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Harness settings from the environment, before suite overrides.
    pub settings: HarnessSettings,
}

impl AppContext {
    /// Construct an `AppContext` from CLI flags and a settings source.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings source cannot be read.
    pub fn new(flags: &OutputFlags, source: &impl SettingsSource) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        // JSON mode owns stdout; progress lines would corrupt the document.
        let quiet = flags.quiet || flags.json;
        Ok(Self {
            output: OutputContext::new(flags.no_color, quiet),
            mode,
            settings: source.load()?,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Terraform adapter honoring the command timeout after `suite` overrides.
    #[must_use]
    pub fn terraform(&self, suite: &SuiteSettings) -> TerraformCli<TokioCommandRunner> {
        TerraformCli::with_timeout(self.settings.overlay(suite).command_timeout())
    }
}
