//! # Error Types
//!
//! Structured error types for geo_core. Input-shape problems (a malformed
//! soil profile or impossible foundation geometry) abort an analysis and are
//! reported through [`CalcError`]. Numeric edge cases met during the
//! calculation itself (zero overburden before a log ratio, a punching-shear
//! search that hits its iteration cap) are recovered inside the modules and
//! never surface here.
//!
//! ## Example
//!
//! ```rust
//! use geo_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(width_m: f64) -> CalcResult<()> {
//!     if width_m <= 0.0 {
//!         return Err(CalcError::invalid_geometry(
//!             "width",
//!             width_m.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for geo_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for analysis operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by LLMs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The layered soil profile is not a contiguous partition of depth
    #[error("Invalid soil profile at layer {layer_index}: {reason}")]
    InvalidProfile { layer_index: usize, reason: String },

    /// Foundation geometry is impossible or inconsistent with the profile
    #[error("Invalid foundation geometry for '{field}': {value} - {reason}")]
    InvalidGeometry {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error (CLI-side loading and saving only)
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidProfile error
    pub fn invalid_profile(layer_index: usize, reason: impl Into<String>) -> Self {
        CalcError::InvalidProfile {
            layer_index,
            reason: reason.into(),
        }
    }

    /// Create an InvalidGeometry error
    pub fn invalid_geometry(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidGeometry {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Input-shape errors abort the analysis; everything else is plumbing.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::InvalidProfile { .. } | CalcError::InvalidGeometry { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidProfile { .. } => "INVALID_PROFILE",
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_profile(2, "Gap between 4.00 m and 5.00 m");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("InvalidProfile"));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::invalid_profile(0, "empty").error_code(), "INVALID_PROFILE");
        assert_eq!(
            CalcError::invalid_geometry("width", "0", "Width must be positive").error_code(),
            "INVALID_GEOMETRY"
        );
        assert_eq!(CalcError::serialization("eof").error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_input_error_classification() {
        assert!(CalcError::invalid_input("spt_n", "-1", "negative").is_input_error());
        assert!(CalcError::invalid_profile(1, "overlap").is_input_error());
        assert!(!CalcError::file_error("read", "a.json", "missing").is_input_error());
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::invalid_geometry("depth", "30", "Embedment below the profile bottom");
        assert_eq!(
            error.to_string(),
            "Invalid foundation geometry for 'depth': 30 - Embedment below the profile bottom"
        );
    }
}
