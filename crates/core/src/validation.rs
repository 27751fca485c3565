//! Field-level validation for submitted forms and API payloads.
//!
//! Parsers push a message per offending field instead of failing fast, so a
//! re-rendered form can show every problem at once.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

/// A single validation message bound to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collected validation messages for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a submission that failed on exactly one field.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.to_owned(), message: message.into() });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// First message recorded for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    pub fn extend(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Parse a required `YYYY-MM-DD` field.
pub fn parse_date(field: &str, raw: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Enter a valid date (YYYY-MM-DD).");
            None
        },
    }
}

/// Parse a required numeric field.
pub fn parse_number<T: FromStr>(
    field: &str,
    raw: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    if let Ok(value) = raw.parse() {
        Some(value)
    } else {
        errors.add(field, "Enter a valid number.");
        None
    }
}

/// Parse an optional numeric field; blank input yields `None`.
pub fn parse_optional_number<T: FromStr>(
    field: &str,
    raw: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    if raw.trim().is_empty() { None } else { parse_number(field, raw, errors) }
}

/// Require a non-blank value.
pub fn require(field: &str, raw: &str, errors: &mut ValidationErrors) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field is required.");
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Record an error when `value` exceeds `max` characters.
pub fn check_max_len(field: &str, value: &str, max: usize, errors: &mut ValidationErrors) {
    if value.chars().count() > max {
        errors.add(field, format!("Ensure this value has at most {max} characters."));
    }
}
