//! infratest library — Terraform test harness used by the `infratest`
//! binary and by Rust integration tests.
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! use std::time::Duration;
//!
//! use infratest::application::services::stack::Stack;
//! use infratest::domain::TerraformOptions;
//! use infratest::infra::terraform::TerraformCli;
//!
//! let tf = TerraformCli::with_timeout(Duration::from_secs(3600));
//! let opts = TerraformOptions::new("modules/s3")
//!     .var("bucket_name", "test-video-ingest-storage-12345")
//!     .with_default_retryable_errors();
//! let stack = Stack::new(&tf, opts)?;
//! stack.init_and_apply().await?;
//! let bucket_id = stack.output("bucket_id").await?;
//! assert_eq!(bucket_id, "test-video-ingest-storage-12345");
//! stack.destroy().await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
