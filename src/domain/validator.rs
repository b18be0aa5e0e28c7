//! Per-request accumulation of field-level validation failures

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::Serialize;

/// Collects the first failure message recorded for each field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    #[serde(rename = "FieldErrors")]
    field_errors: BTreeMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when at least one field has a recorded failure
    pub fn has_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    /// Record `message` for `field` unless the field already failed
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    /// Record `message` for `field` when `ok` is false
    pub fn check_field(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_field_error(field, message);
        }
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .field_errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();

        write!(f, "{}", parts.join(", "))
    }
}

/// True when `value` matches `rx`
pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

/// True when `value` is not one of `list`
pub fn not_in(value: &str, list: &[&str]) -> bool {
    !list.contains(&value)
}
