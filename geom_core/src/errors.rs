//! # Error Types
//!
//! Structured error types for geom_core. Every fallible operation in the
//! crate returns [`GeomResult`], and each variant carries enough context to
//! tell which precondition was violated.
//!
//! ## Example
//!
//! ```rust
//! use geom_core::errors::{GeomError, GeomResult};
//!
//! fn validate_radius(radius_m: f64) -> GeomResult<()> {
//!     if radius_m <= 0.0 {
//!         return Err(GeomError::invalid_input(
//!             "radius",
//!             radius_m.to_string(),
//!             "Radius must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_radius(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for geom_core operations
pub type GeomResult<T> = Result<T, GeomError>;

/// Structured error type for shape, store and arithmetic operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum GeomError {
    /// An input value is invalid (non-positive dimension, even root of a negative, ...)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// An operand has the wrong shape variant for the requested operation
    #[error("Type mismatch in {operation}: expected {expected}, found {found}")]
    TypeMismatch {
        operation: String,
        expected: String,
        found: String,
    },

    /// Mass was requested from a shape with no material attached
    #[error("Material not set on {shape}")]
    MaterialNotSet { shape: String },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material not found in the catalog or reference table
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Calculation failed (iteration did not converge, overflow, ...)
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Store is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl GeomError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        GeomError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a TypeMismatch error
    pub fn type_mismatch(operation: impl Into<String>, expected: impl Into<String>, found: impl Into<String>) -> Self {
        GeomError::TypeMismatch {
            operation: operation.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a MaterialNotSet error
    pub fn material_not_set(shape: impl Into<String>) -> Self {
        GeomError::MaterialNotSet { shape: shape.into() }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        GeomError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        GeomError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        GeomError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        GeomError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        GeomError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from any displayable cause
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        GeomError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GeomError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            GeomError::InvalidInput { .. } => "INVALID_INPUT",
            GeomError::TypeMismatch { .. } => "TYPE_MISMATCH",
            GeomError::MaterialNotSet { .. } => "MATERIAL_NOT_SET",
            GeomError::MissingField { .. } => "MISSING_FIELD",
            GeomError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            GeomError::CalculationFailed { .. } => "CALCULATION_FAILED",
            GeomError::FileError { .. } => "FILE_ERROR",
            GeomError::FileLocked { .. } => "FILE_LOCKED",
            GeomError::SerializationError { .. } => "SERIALIZATION_ERROR",
            GeomError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
