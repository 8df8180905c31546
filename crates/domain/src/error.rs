//! Domain errors
//!
//! Pure domain errors with no infrastructure dependencies

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::reading::AllowedRange;

/// Rejection of an incoming reading payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A numeric field lies outside its declared range
    #[error("{field} value {value} is outside the allowed range {allowed_range}")]
    OutOfRange {
        /// Offending field name
        field: &'static str,
        /// Received value
        value: f64,
        /// Range the value must fall in
        allowed_range: AllowedRange,
    },

    /// A numeric field carried something that is not a number
    #[error("{field} must be numeric, got {value}")]
    NotNumeric {
        /// Offending field name
        field: &'static str,
        /// Received value
        value: Value,
        /// Range the value must fall in
        allowed_range: AllowedRange,
    },

    /// A text field carried something that is not a string
    #[error("{field} must be a string, got {value}")]
    NotText {
        /// Offending field name
        field: &'static str,
        /// Received value
        value: Value,
    },

    /// The payload was not a JSON object
    #[error("reading payload must be a JSON object")]
    NotAnObject,
}

/// Wire shape of a validation error: `{field, value, allowedRange}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Offending field, absent when the payload itself is malformed
    pub field: Option<&'static str>,
    /// Received value
    pub value: Value,
    /// Range the value must fall in, for numeric fields
    pub allowed_range: Option<AllowedRange>,
    /// Human-readable message
    pub message: String,
}

impl ValidationError {
    /// Name of the offending field, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::NotNumeric { field, .. }
            | ValidationError::NotText { field, .. } => Some(field),
            ValidationError::NotAnObject => None,
        }
    }

    /// Structured report for API responses
    pub fn report(&self) -> ValidationReport {
        let (value, allowed_range) = match self {
            ValidationError::OutOfRange {
                value,
                allowed_range,
                ..
            } => (Value::from(*value), Some(*allowed_range)),
            ValidationError::NotNumeric {
                value,
                allowed_range,
                ..
            } => (value.clone(), Some(*allowed_range)),
            ValidationError::NotText { value, .. } => (value.clone(), None),
            ValidationError::NotAnObject => (Value::Null, None),
        };

        ValidationReport {
            field: self.field(),
            value,
            allowed_range,
            message: self.to_string(),
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.report().serialize(serializer)
    }
}
