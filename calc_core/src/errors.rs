//! # Error Types
//!
//! Structured error types for calc_core. Every failure is local to a single
//! call and carries enough context for a host to show a message, or to map
//! it onto the generic "Error" display state.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn checked_sqrt(x: f64) -> CalcResult<f64> {
//!     if x < 0.0 {
//!         return Err(CalcError::domain("sqrt", "argument must be non-negative"));
//!     }
//!     Ok(x.sqrt())
//! }
//!
//! assert_eq!(checked_sqrt(-1.0).unwrap_err().error_code(), "DOMAIN_ERROR");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Expression text is malformed or evaluates to a non-finite value
    #[error("Invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// Argument outside the mathematical domain of a function
    #[error("Domain error in {function}: {reason}")]
    DomainError { function: String, reason: String },

    /// Result would exceed what an f64 (or the intermediate type) can hold
    #[error("Range error in {function}: {reason}")]
    RangeError { function: String, reason: String },

    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Unit name not recognised by the converter
    #[error("Unknown unit: {unit}")]
    UnknownUnit { unit: String },

    /// Units belong to different categories (e.g. meters to pounds)
    #[error("Cannot convert {from} to {to}: units measure different quantities")]
    IncompatibleUnits { from: String, to: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// TOML/JSON serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidExpression error
    pub fn invalid_expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create a DomainError
    pub fn domain(function: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::DomainError {
            function: function.into(),
            reason: reason.into(),
        }
    }

    /// Create a RangeError
    pub fn range(function: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::RangeError {
            function: function.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownUnit error
    pub fn unknown_unit(unit: impl Into<String>) -> Self {
        CalcError::UnknownUnit { unit: unit.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from evaluating user input, as opposed to
    /// configuration or I/O. Hosts show these as the plain "Error" state.
    pub fn is_calculation_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidExpression { .. } | CalcError::DomainError { .. } | CalcError::RangeError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidExpression { .. } => "INVALID_EXPRESSION",
            CalcError::DomainError { .. } => "DOMAIN_ERROR",
            CalcError::RangeError { .. } => "RANGE_ERROR",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            CalcError::IncompatibleUnits { .. } => "INCOMPATIBLE_UNITS",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}
