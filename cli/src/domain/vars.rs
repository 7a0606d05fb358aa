//! Input variables passed to a provisioning target.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// A typed input variable value.
///
/// Deserializes untagged so suite files can write plain YAML scalars,
/// sequences and mappings. Unquoted YAML numbers are parsed as numbers, so
/// version-like strings must be quoted: `k8s_version: "1.10"`, not `1.10`
/// (which reaches the tool as `1.1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<VarValue>),
    Map(BTreeMap<String, VarValue>),
}

impl VarValue {
    /// Render the value for a `-var key=value` flag.
    ///
    /// Top-level strings are passed raw; strings nested inside a list or map
    /// are quoted so the tool parses them as HCL literals.
    #[must_use]
    pub fn to_hcl(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            other => {
                let mut out = String::new();
                other.write_hcl(&mut out);
                out
            }
        }
    }

    fn write_hcl(&self, out: &mut String) {
        match self {
            Self::Null => out.push_str("null"),
            Self::Bool(b) => {
                let _ = write!(out, "{b}");
            }
            Self::Number(n) => {
                let _ = write!(out, "{n}");
            }
            Self::String(s) => write_quoted(out, s),
            Self::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_hcl(out);
                }
                out.push(']');
            }
            Self::Map(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_quoted(out, key);
                    out.push_str(" = ");
                    value.write_hcl(out);
                }
                out.push('}');
            }
        }
    }
}

/// Quote `s` as an HCL string literal; `${` and `%{` are escaped so the
/// value is never read as a template.
fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for VarValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl<T: Into<VarValue>> From<Vec<T>> for VarValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for VarValue {
    fn from(items: [&str; N]) -> Self {
        Self::List(items.iter().map(|s| Self::from(*s)).collect())
    }
}

impl<T: Into<VarValue>> From<BTreeMap<String, T>> for VarValue {
    fn from(entries: BTreeMap<String, T>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// Format `-var key=value` argument pairs in key order.
#[must_use]
pub fn var_args(vars: &BTreeMap<String, VarValue>) -> Vec<String> {
    vars.iter()
        .flat_map(|(key, value)| ["-var".to_string(), format!("{key}={}", value.to_hcl())])
        .collect()
}
