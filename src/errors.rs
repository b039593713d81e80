//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation failures carry
//! a per-field map so the request layer can report them back field by field.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation messages, keyed by field path (e.g. `items.0.qty`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty set of field errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns true when no field has failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true when the given field has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Turns the collected messages into `Ok(())` or an [`Error::Validation`].
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { errors: self })
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Every failure the crate reports.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input rejected before anything was written
    #[error("Validation failed: {errors}")]
    Validation { errors: FieldErrors },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A hard delete refused because other rows still point at the target
    #[error("{entity} {id} is still referenced by {dependents}")]
    InUse {
        entity: &'static str,
        id: i64,
        dependents: &'static str,
    },

    #[error("Missing or malformed session")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::Validation { errors }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_collect_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("items.0.qty", "must be at least 1");
        errors.add("items.0.qty", "must be an integer");
        errors.add("customer_id", "selected customer does not exist");

        assert!(errors.contains("customer_id"));
        assert_eq!(errors.get("items.0.qty").map(<[String]>::len), Some(2));
        assert!(matches!(
            errors.into_result(),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_empty_field_errors_pass() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("name", "is required");
        let json = serde_json::to_value(&errors).ok();
        assert_eq!(json, Some(serde_json::json!({ "name": ["is required"] })));
    }
}
