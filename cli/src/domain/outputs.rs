//! Typed views over values read back with `terraform output -json`.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::{OutputError, TerraformError};

/// A single named output value after convergence.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputValue {
    name: String,
    value: Value,
    sensitive: bool,
}

impl OutputValue {
    #[must_use]
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            sensitive: false,
        }
    }

    /// Mark the value as sensitive; reports then never show it.
    #[must_use]
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Parse the stdout of `terraform output -json <name>`.
    ///
    /// # Errors
    ///
    /// Returns `TerraformError::OutputParse` if stdout is not valid JSON.
    pub fn parse(name: &str, stdout: &[u8]) -> Result<Self, TerraformError> {
        let value = serde_json::from_slice(stdout).map_err(|e| TerraformError::OutputParse {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(name, value))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.value
    }

    /// Render the output as a string.
    ///
    /// Strings come back verbatim, other scalars as their literal form and
    /// `null` as an empty string. Lists and maps render as compact JSON.
    #[must_use]
    pub fn as_string(&self) -> String {
        scalar_to_string(&self.value).unwrap_or_else(|| self.value.to_string())
    }

    /// Read the output as a list of scalars.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::WrongType` if the value is not a list of scalars.
    pub fn as_list(&self) -> Result<Vec<String>, OutputError> {
        let Value::Array(items) = &self.value else {
            return Err(self.wrong_type("list"));
        };
        items
            .iter()
            .map(|item| scalar_to_string(item).ok_or_else(|| self.wrong_type("list")))
            .collect()
    }

    /// Read the output as a map of scalars.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::WrongType` if the value is not a map of scalars.
    pub fn as_map(&self) -> Result<BTreeMap<String, String>, OutputError> {
        let Value::Object(entries) = &self.value else {
            return Err(self.wrong_type("map"));
        };
        entries
            .iter()
            .map(|(k, v)| {
                scalar_to_string(v)
                    .map(|s| (k.clone(), s))
                    .ok_or_else(|| self.wrong_type("map"))
            })
            .collect()
    }

    /// Short name of the JSON kind held by this output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        kind_of(&self.value)
    }

    fn wrong_type(&self, expected: &'static str) -> OutputError {
        OutputError::WrongType {
            name: self.name.clone(),
            expected,
            actual: self.kind(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::Null => "null",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// One entry in the document produced by `terraform output -json`.
#[derive(Debug, Clone, Deserialize)]
struct OutputEntry {
    #[serde(default)]
    sensitive: bool,
    value: Value,
}

/// Every output of a converged target, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    values: BTreeMap<String, OutputValue>,
}

impl Outputs {
    /// Parse the stdout of `terraform output -json` (all outputs).
    ///
    /// # Errors
    ///
    /// Returns `TerraformError::OutputParse` if stdout is not the expected
    /// `{ name: { value, sensitive, type } }` document.
    pub fn parse(stdout: &[u8]) -> Result<Self, TerraformError> {
        let entries: BTreeMap<String, OutputEntry> =
            serde_json::from_slice(stdout).map_err(|e| TerraformError::OutputParse {
                name: "*".to_string(),
                reason: e.to_string(),
            })?;
        let values = entries
            .into_iter()
            .map(|(k, e)| {
                let v = OutputValue::new(k.clone(), e.value).sensitive(e.sensitive);
                (k, v)
            })
            .collect();
        Ok(Self { values })
    }

    /// Look up an output by name.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::NotFound` if the target exposes no such output.
    pub fn get(&self, name: &str) -> Result<&OutputValue, OutputError> {
        self.values
            .get(name)
            .ok_or_else(|| OutputError::NotFound(name.to_string()))
    }

    #[must_use]
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(OutputValue::is_sensitive)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
