//! Infrastructure implementations of the configuration ports.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{SettingsSource, SuiteStore};
use crate::domain::config::ENV_PREFIX;
use crate::domain::{HarnessSettings, Suite};

/// Production implementation of `SuiteStore` that reads a YAML file on disk.
///
/// Relative target directories are resolved against the file's directory.
pub struct YamlSuiteStore;

impl SuiteStore for YamlSuiteStore {
    fn load(&self, path: &Path) -> Result<Suite> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let suite: Suite = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Ok(suite.resolve_paths(base))
    }
}

/// Settings loaded from `INFRATEST_*` environment variables via `envy`.
///
/// - `INFRATEST_TERRAFORM_BIN`        (default `terraform`)
/// - `INFRATEST_COMMAND_TIMEOUT_SECS` (default `3600`)
/// - `INFRATEST_MAX_RETRIES`          (optional)
/// - `INFRATEST_RETRY_DELAY_SECS`     (optional)
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn load(&self) -> Result<HarnessSettings> {
        settings_from_vars(std::env::vars())
    }
}

/// Parse harness settings from `(name, value)` pairs; only `INFRATEST_*`
/// names are considered.
///
/// # Errors
///
/// Returns an error if a present setting cannot be parsed.
pub fn settings_from_vars(
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<HarnessSettings> {
    envy::prefixed(ENV_PREFIX)
        .from_iter::<_, HarnessSettings>(vars)
        .with_context(|| format!("failed to load settings from {ENV_PREFIX}* env vars"))
}
