//! The options record naming a provisioning target and how to drive it.
//!
//! Pure functions only — no I/O, no async, no filesystem access. Argument
//! vectors are built here so the adapter only has to spawn them.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::vars::{VarValue, var_args};

/// Binary invoked when no override is configured.
pub const DEFAULT_TERRAFORM_BINARY: &str = "terraform";

/// Additional attempts made after a retryable failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Pause between attempts after a retryable failure.
pub const DEFAULT_TIME_BETWEEN_RETRIES: Duration = Duration::from_secs(5);

/// Transient errors that are worth retrying, as `(regex, description)`.
pub const DEFAULT_RETRYABLE_ERRORS: &[(&str, &str)] = &[
    (
        ".*read: connection reset by peer.*",
        "Failed to reach helm charts repository.",
    ),
    (".*transport is closing.*", "Failed to reach Kubernetes API."),
    (
        ".*unable to verify signature.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*unable to verify checksum.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*no provider exists with the given name.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*registry service is unreachable.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*Error installing provider.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*Failed to query available provider packages.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*timeout while waiting for plugin to start.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*timed out waiting for server handshake.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        "could not query provider registry for",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*Provider produced inconsistent result after apply.*",
        "Provider eventual consistency error.",
    ),
];

/// How to run the provisioning tool against one target directory.
#[derive(Debug, Clone)]
pub struct TerraformOptions {
    /// Directory holding the declarative definitions.
    pub terraform_dir: PathBuf,
    /// Program to spawn, `terraform` unless overridden.
    pub terraform_binary: String,
    /// Input variables, passed as `-var` flags in key order.
    pub vars: BTreeMap<String, VarValue>,
    /// Variable files, passed as `-var-file` flags in order.
    pub var_files: Vec<PathBuf>,
    /// Extra environment for every invocation.
    pub env_vars: BTreeMap<String, String>,
    /// Backend settings, passed to `init` as `-backend-config` flags.
    pub backend_config: BTreeMap<String, String>,
    /// Add `-no-color` to every command.
    pub no_color: bool,
    /// State locking; `-lock=false` is passed when disabled.
    pub lock: bool,
    /// Optional `-parallelism=N` for apply and destroy.
    pub parallelism: Option<u32>,
    /// Retryable error catalogue as `(regex, description)`; the first
    /// matching entry names the failure.
    pub retryable_errors: Vec<(String, String)>,
    /// Additional attempts after a retryable failure.
    pub max_retries: u32,
    /// Pause between attempts.
    pub time_between_retries: Duration,
}

impl TerraformOptions {
    /// Options for `terraform_dir` with no variables and no retries.
    #[must_use]
    pub fn new(terraform_dir: impl Into<PathBuf>) -> Self {
        Self {
            terraform_dir: terraform_dir.into(),
            terraform_binary: DEFAULT_TERRAFORM_BINARY.to_string(),
            vars: BTreeMap::new(),
            var_files: Vec::new(),
            env_vars: BTreeMap::new(),
            backend_config: BTreeMap::new(),
            no_color: false,
            lock: true,
            parallelism: None,
            retryable_errors: Vec::new(),
            max_retries: 0,
            time_between_retries: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn var(mut self, key: impl Into<String>, value: impl Into<VarValue>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn var_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.var_files.push(path.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn backend(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.backend_config.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    #[must_use]
    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.terraform_binary = binary.into();
        self
    }

    #[must_use]
    pub fn lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    #[must_use]
    pub fn parallelism(mut self, n: u32) -> Self {
        self.parallelism = Some(n);
        self
    }

    /// Add a retryable pattern; re-adding a pattern replaces its description
    /// and keeps its position.
    #[must_use]
    pub fn retryable_error(
        mut self,
        pattern: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let pattern = pattern.into();
        let description = description.into();
        match self.retryable_errors.iter_mut().find(|(p, _)| *p == pattern) {
            Some(entry) => entry.1 = description,
            None => self.retryable_errors.push((pattern, description)),
        }
        self
    }

    #[must_use]
    pub fn retries(mut self, max_retries: u32, time_between_retries: Duration) -> Self {
        self.max_retries = max_retries;
        self.time_between_retries = time_between_retries;
        self
    }

    /// Fill in the default retryable error catalogue and retry budget.
    ///
    /// Caller-supplied patterns and a non-zero retry budget are kept.
    #[must_use]
    pub fn with_default_retryable_errors(mut self) -> Self {
        for (pattern, description) in DEFAULT_RETRYABLE_ERRORS {
            if !self.retryable_errors.iter().any(|(p, _)| p == pattern) {
                self.retryable_errors
                    .push(((*pattern).to_string(), (*description).to_string()));
            }
        }
        if self.max_retries == 0 {
            self.max_retries = DEFAULT_MAX_RETRIES;
        }
        if self.time_between_retries.is_zero() {
            self.time_between_retries = DEFAULT_TIME_BETWEEN_RETRIES;
        }
        self
    }

    /// `-chdir=<dir>` global flag prepended to every subcommand.
    #[must_use]
    pub fn chdir_arg(&self) -> String {
        format!("-chdir={}", self.terraform_dir.display())
    }

    /// Arguments for `terraform init`.
    #[must_use]
    pub fn init_args(&self) -> Vec<String> {
        let mut args = vec![
            self.chdir_arg(),
            "init".to_string(),
            "-input=false".to_string(),
            "-upgrade=false".to_string(),
        ];
        for (key, value) in &self.backend_config {
            args.push(format!("-backend-config={key}={value}"));
        }
        self.push_no_color(&mut args);
        args
    }

    /// Arguments for `terraform apply`.
    #[must_use]
    pub fn apply_args(&self) -> Vec<String> {
        self.mutating_args("apply")
    }

    /// Arguments for `terraform destroy`.
    #[must_use]
    pub fn destroy_args(&self) -> Vec<String> {
        self.mutating_args("destroy")
    }

    /// Arguments for `terraform plan` (detailed exit code).
    #[must_use]
    pub fn plan_args(&self) -> Vec<String> {
        let mut args = vec![
            self.chdir_arg(),
            "plan".to_string(),
            "-input=false".to_string(),
            "-detailed-exitcode".to_string(),
        ];
        self.push_lock(&mut args);
        self.push_vars(&mut args);
        self.push_no_color(&mut args);
        args
    }

    /// Arguments for `terraform validate`.
    #[must_use]
    pub fn validate_args(&self) -> Vec<String> {
        let mut args = vec![self.chdir_arg(), "validate".to_string()];
        self.push_no_color(&mut args);
        args
    }

    /// Arguments for `terraform output -json <name>`.
    #[must_use]
    pub fn output_args(&self, name: &str) -> Vec<String> {
        vec![
            self.chdir_arg(),
            "output".to_string(),
            "-no-color".to_string(),
            "-json".to_string(),
            name.to_string(),
        ]
    }

    /// Arguments for `terraform output -json` (every output).
    #[must_use]
    pub fn output_all_args(&self) -> Vec<String> {
        vec![
            self.chdir_arg(),
            "output".to_string(),
            "-no-color".to_string(),
            "-json".to_string(),
        ]
    }

    fn mutating_args(&self, subcommand: &str) -> Vec<String> {
        let mut args = vec![
            self.chdir_arg(),
            subcommand.to_string(),
            "-input=false".to_string(),
            "-auto-approve".to_string(),
        ];
        self.push_lock(&mut args);
        if let Some(n) = self.parallelism {
            args.push(format!("-parallelism={n}"));
        }
        self.push_vars(&mut args);
        self.push_no_color(&mut args);
        args
    }

    fn push_lock(&self, args: &mut Vec<String>) {
        if !self.lock {
            args.push("-lock=false".to_string());
        }
    }

    fn push_vars(&self, args: &mut Vec<String>) {
        args.extend(var_args(&self.vars));
        for file in &self.var_files {
            args.push("-var-file".to_string());
            args.push(file.display().to_string());
        }
    }

    fn push_no_color(&self, args: &mut Vec<String>) {
        if self.no_color {
            args.push("-no-color".to_string());
        }
    }
}
