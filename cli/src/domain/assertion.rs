//! Literal expectations checked against outputs after convergence.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::outputs::OutputValue;

/// A single expectation about an output value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The value is not empty (string, list or map).
    NotEmpty,
    /// The value rendered as a string equals this literal.
    Equals(String),
    /// Substring of a string, element of a list, or key of a map.
    Contains(String),
    /// Length of a list or map, or character count of a string.
    Len(usize),
    /// The value is a map whose listed keys all hold non-empty values.
    MapKeysNotEmpty(Vec<String>),
    /// The value rendered as a string matches this regex.
    Matches(String),
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEmpty => write!(f, "not empty"),
            Self::Equals(s) => write!(f, "equals \"{s}\""),
            Self::Contains(s) => write!(f, "contains \"{s}\""),
            Self::Len(n) => write!(f, "has length {n}"),
            Self::MapKeysNotEmpty(keys) => write!(f, "has non-empty keys [{}]", keys.join(", ")),
            Self::Matches(p) => write!(f, "matches /{p}/"),
        }
    }
}

/// A failed expectation, with the observed value for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionFailure {
    pub output: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "output '{}' expected to {}, got {}",
            self.output, self.expected, self.actual
        )
    }
}

impl std::error::Error for AssertionFailure {}

impl Expectation {
    /// Check the expectation against `value`.
    ///
    /// # Errors
    ///
    /// Returns an `AssertionFailure` describing the mismatch.
    pub fn check(&self, value: &OutputValue) -> Result<(), AssertionFailure> {
        let ok = match self {
            Self::NotEmpty => !is_empty(value.raw()),
            Self::Equals(expected) => value.as_string() == *expected,
            Self::Contains(needle) => contains(value.raw(), needle),
            Self::Len(n) => length(value.raw()) == Some(*n),
            Self::MapKeysNotEmpty(keys) => match value.as_map() {
                Ok(map) => keys
                    .iter()
                    .all(|k| map.get(k).is_some_and(|v| !v.is_empty())),
                Err(_) => false,
            },
            Self::Matches(pattern) => {
                Regex::new(pattern).is_ok_and(|re| re.is_match(&value.as_string()))
            }
        };
        if ok {
            Ok(())
        } else {
            Err(self.failure(value))
        }
    }

    /// Validate the expectation itself (e.g. regex syntax).
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the expectation can never pass.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Matches(pattern) => Regex::new(pattern).map(|_| ()).map_err(|e| e.to_string()),
            _ => Ok(()),
        }
    }

    fn failure(&self, value: &OutputValue) -> AssertionFailure {
        AssertionFailure {
            output: value.name().to_string(),
            expected: self.to_string(),
            actual: describe(value),
        }
    }
}

/// Expectations bound to one named output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCheck {
    pub output: String,
    /// Written as `- not_empty` or `- contains: x` in suite files.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub expect: Vec<Expectation>,
}

impl OutputCheck {
    #[must_use]
    pub fn new(output: impl Into<String>, expect: Vec<Expectation>) -> Self {
        Self {
            output: output.into(),
            expect,
        }
    }

    /// Run every expectation and collect all failures.
    #[must_use]
    pub fn evaluate(&self, value: &OutputValue) -> Vec<AssertionFailure> {
        self.expect
            .iter()
            .filter_map(|e| e.check(value).err())
            .collect()
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.contains(needle),
        Value::Array(items) => items.iter().any(|item| match item {
            Value::String(s) => s == needle,
            other => other.to_string() == needle,
        }),
        Value::Object(entries) => entries.contains_key(needle),
        Value::Bool(_) | Value::Number(_) => value.to_string().contains(needle),
        Value::Null => false,
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(entries) => Some(entries.len()),
        Value::Null => Some(0),
        Value::Bool(_) | Value::Number(_) => None,
    }
}

fn describe(value: &OutputValue) -> String {
    const MAX: usize = 120;
    if value.is_sensitive() {
        return format!("{} <sensitive>", value.kind());
    }
    let rendered = value.raw().to_string();
    if rendered.chars().count() > MAX {
        let cut: String = rendered.chars().take(MAX).collect();
        format!("{} {cut}...", value.kind())
    } else {
        format!("{} {rendered}", value.kind())
    }
}
