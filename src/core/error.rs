//! Error types for holding creation and price updates.

use thiserror::Error;

/// Raised when holding input is missing or not a usable number.
///
/// This is the only error the core produces. It is always recoverable: the
/// store is left untouched and the caller may correct the input and retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was empty or only whitespace.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A numeric field could not be parsed.
    #[error("Field {field} is not a number: {value:?}")]
    NotANumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw input.
        value: String,
    },

    /// A numeric field parsed but was zero, negative or not finite.
    #[error("Field {field} must be a positive finite number, got {value}")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The parsed value.
        value: f64,
    },

    /// The value would make the position's cost, market value or gain
    /// percentage too large to track.
    #[error("Field {field} puts the position outside the supported range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The parsed value.
        value: f64,
    },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::NotANumber { field, .. }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::OutOfRange { field, .. } => field,
        }
    }
}
