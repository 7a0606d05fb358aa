//! Domain layer — pure types, argument formatting, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod assertion;
pub mod config;
pub mod error;
pub mod options;
pub mod outputs;
pub mod report;
pub mod retry;
pub mod scenario;
pub mod vars;

pub use assertion::{AssertionFailure, Expectation, OutputCheck};
pub use config::{HarnessSettings, SuiteSettings};
pub use error::{ConfigError, OutputError, SuiteError, TerraformError};
pub use options::TerraformOptions;
pub use outputs::{OutputValue, Outputs};
pub use report::{Outcome, ScenarioReport, SuiteReport, Teardown};
pub use retry::RetryPolicy;
pub use scenario::{Scenario, Suite};
pub use vars::VarValue;
