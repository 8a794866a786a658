//! Request validation for the user mapping endpoint.
//!
//! Each field is checked independently and every failing reason is kept,
//! so a client sending `{}` learns about both identifiers at once.

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::{EXTERNAL_ID_MAX_LEN, Error};

/// Reasons a single request field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Name of the JSON field.
    pub field: &'static str,
    /// Human-readable reasons, in check order.
    pub errors: Vec<String>,
}

/// Identifiers that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPair {
    /// First identifier.
    pub id1: String,
    /// Second identifier.
    pub id2: String,
}

/// Validation rule applied to the raw request fields.
pub trait PairValidator: Send + Sync {
    /// Check both fields, returning every violation on failure.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldViolation`] per failing field.
    fn validate(
        &self,
        id1: Option<&Value>,
        id2: Option<&Value>,
    ) -> Result<ValidatedPair, Vec<FieldViolation>>;
}

/// Accepts non-empty strings up to `max_len` characters.
///
/// NUL is rejected because PostgreSQL text columns cannot store it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBoundedPairValidator {
    max_len: usize,
}

impl LengthBoundedPairValidator {
    /// Validator with a custom length bound.
    pub const fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Configured length bound.
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    fn check(&self, field: &'static str, value: Option<&Value>) -> Result<String, FieldViolation> {
        let errors = match value {
            None | Some(Value::Null) => vec![
                format!("{field} should not be empty"),
                format!("{field} must be a string"),
            ],
            Some(Value::String(s)) if s.is_empty() => {
                vec![format!("{field} should not be empty")]
            }
            Some(Value::String(s)) if s.chars().count() > self.max_len => vec![format!(
                "{field} must be at most {} characters long",
                self.max_len
            )],
            Some(Value::String(s)) if s.contains('\0') => {
                vec![format!("{field} must not contain NUL characters")]
            }
            Some(Value::String(s)) => return Ok(s.clone()),
            Some(_) => vec![format!("{field} must be a string")],
        };
        Err(FieldViolation { field, errors })
    }
}

impl Default for LengthBoundedPairValidator {
    fn default() -> Self {
        Self::new(EXTERNAL_ID_MAX_LEN)
    }
}

impl PairValidator for LengthBoundedPairValidator {
    fn validate(
        &self,
        id1: Option<&Value>,
        id2: Option<&Value>,
    ) -> Result<ValidatedPair, Vec<FieldViolation>> {
        match (self.check("id1", id1), self.check("id2", id2)) {
            (Ok(id1), Ok(id2)) => Ok(ValidatedPair { id1, id2 }),
            (first, second) => Err([first.err(), second.err()].into_iter().flatten().collect()),
        }
    }
}

/// Build the `400` payload for a set of violations.
pub fn validation_error(violations: &[FieldViolation]) -> Error {
    Error::invalid_request("Validation failed").with_details(json!({ "errors": violations }))
}
