//! Temporary suites and a fake `terraform` executable.

#![allow(dead_code, clippy::expect_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub fn infratest() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("infratest"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("INFRATEST_SUITE");
    cmd.env_remove("INFRATEST_TERRAFORM_BIN");
    cmd
}

/// A suite directory with one subdirectory per target and, on Unix, a fake
/// `terraform` that appends `<target> <subcommand>` to `calls.log`.
pub struct Workspace {
    pub dir: TempDir,
}

/// Fake tool: `output` prints `<target>/outputs.json`; `apply` fails when
/// `<target>/fail_apply` exists; `destroy` fails when `<target>/fail_destroy`
/// exists.
const FAKE_TERRAFORM: &str = r#"#!/bin/sh
dir="${1#-chdir=}"
sub="$2"
echo "$(basename "$dir") $sub" >> "$FAKE_TF_LOG"
case "$sub" in
  output)
    cat "$dir/outputs.json"
    ;;
  apply)
    if [ -f "$dir/fail_apply" ]; then
      echo "Error: simulated apply failure" >&2
      exit 1
    fi
    ;;
  destroy)
    if [ -f "$dir/fail_destroy" ]; then
      echo "Error: simulated destroy failure" >&2
      exit 1
    fi
    ;;
esac
exit 0
"#;

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_suite(&self, yaml: &str) -> PathBuf {
        let path = self.path().join("suite.yaml");
        std::fs::write(&path, yaml).expect("write suite");
        path
    }

    /// Create a target directory whose `output -json` prints `outputs`.
    pub fn target(&self, name: &str, outputs: &serde_json::Value) -> PathBuf {
        let dir = self.path().join(name);
        std::fs::create_dir_all(&dir).expect("create target");
        let doc: serde_json::Map<String, serde_json::Value> = outputs
            .as_object()
            .expect("object")
            .iter()
            .map(|(k, v)| {
                (
                    k.clone(),
                    serde_json::json!({ "sensitive": false, "type": "string", "value": v }),
                )
            })
            .collect();
        std::fs::write(
            dir.join("outputs.json"),
            serde_json::to_vec(&doc).expect("serialize"),
        )
        .expect("write outputs");
        dir
    }

    pub fn fail(&self, target: &str, subcommand: &str) {
        std::fs::write(self.path().join(target).join(format!("fail_{subcommand}")), "")
            .expect("write marker");
    }

    #[cfg(unix)]
    pub fn fake_terraform(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join("terraform");
        std::fs::write(&path, FAKE_TERRAFORM).expect("write fake terraform");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod fake terraform");
        path
    }

    pub fn log_path(&self) -> PathBuf {
        self.path().join("calls.log")
    }

    /// Recorded `<target> <subcommand>` lines for one target.
    pub fn calls_for(&self, target: &str) -> Vec<String> {
        std::fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .filter_map(|l| l.strip_prefix(&format!("{target} ")).map(String::from))
            .collect()
    }

    /// `infratest` wired to the fake tool.
    #[cfg(unix)]
    pub fn command(&self) -> Command {
        let mut cmd = infratest();
        cmd.env("INFRATEST_TERRAFORM_BIN", self.fake_terraform());
        cmd.env("INFRATEST_RETRY_DELAY_SECS", "0");
        cmd.env("FAKE_TF_LOG", self.log_path());
        cmd
    }
}
