//! Command implementations

pub mod check;
pub mod list;
pub mod run;
pub mod validate;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::application::ports::SuiteStore;
use crate::domain::Suite;

/// Suite file argument shared by every suite command.
#[derive(Args, Debug, Clone)]
pub struct SuiteArgs {
    /// Path to the suite YAML file
    #[arg(env = "INFRATEST_SUITE", value_name = "SUITE")]
    pub suite: PathBuf,
}

impl SuiteArgs {
    /// Load and validate the suite.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// suite is invalid.
    pub fn load(&self, store: &impl SuiteStore) -> Result<Suite> {
        let suite = store.load(&self.suite)?;
        suite.validate()?;
        Ok(suite)
    }
}
