//! # Error Types
//!
//! Structured error types for patio_core. Every condition is local and
//! recoverable: the worst outcome is that one user action is rejected, and the
//! controller decides whether to abort the intent or show a warning.
//!
//! ## Example
//!
//! ```rust
//! use patio_core::errors::{PatioError, PatioResult};
//!
//! fn validate_extent(width_mm: f64) -> PatioResult<()> {
//!     if width_mm <= 0.0 {
//!         return Err(PatioError::invalid_value(
//!             "width",
//!             width_mm.to_string(),
//!             "Extent must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_extent(-5.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::patio::ElementId;

/// Result type alias for patio_core operations
pub type PatioResult<T> = Result<T, PatioError>;

/// Structured error type for engine and model operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PatioError {
    /// A coordinate or extent is non-finite, or an extent is not positive
    #[error("Invalid value for '{field}': {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// A measured axis value is larger than every entry in the catalog
    #[error("No stock size in '{catalog}' covers {value_mm} mm (largest is {max_mm} mm)")]
    OutOfCatalogRange {
        catalog: String,
        value_mm: f64,
        max_mm: f64,
    },

    /// The identity was never committed or has been removed
    #[error("Unknown element identity: {id}")]
    UnknownIdentity { id: ElementId },

    /// A catalog table is empty, unsorted or holds a non-positive size
    #[error("Invalid catalog '{catalog}': {reason}")]
    InvalidCatalog { catalog: String, reason: String },

    /// Configuration or catalog file could not be read or parsed
    #[error("Configuration error in '{path}': {reason}")]
    Config { path: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PatioError {
    /// Create an InvalidValue error
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PatioError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutOfCatalogRange error
    pub fn out_of_catalog_range(catalog: impl Into<String>, value_mm: f64, max_mm: f64) -> Self {
        PatioError::OutOfCatalogRange {
            catalog: catalog.into(),
            value_mm,
            max_mm,
        }
    }

    /// Create an UnknownIdentity error
    pub fn unknown_identity(id: ElementId) -> Self {
        PatioError::UnknownIdentity { id }
    }

    /// Create an InvalidCatalog error
    pub fn invalid_catalog(catalog: impl Into<String>, reason: impl Into<String>) -> Self {
        PatioError::InvalidCatalog {
            catalog: catalog.into(),
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(path: impl Into<String>, reason: impl Into<String>) -> Self {
        PatioError::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PatioError::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller can carry on after surfacing this error.
    ///
    /// Everything except `Internal` only rejects the current user action.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PatioError::Internal { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PatioError::InvalidValue { .. } => "INVALID_VALUE",
            PatioError::OutOfCatalogRange { .. } => "OUT_OF_CATALOG_RANGE",
            PatioError::UnknownIdentity { .. } => "UNKNOWN_IDENTITY",
            PatioError::InvalidCatalog { .. } => "INVALID_CATALOG",
            PatioError::Config { .. } => "CONFIG_ERROR",
            PatioError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = PatioError::out_of_catalog_range("framing", 200.0, 184.0);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("OutOfCatalogRange"));
        let roundtrip: PatioError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PatioError::invalid_value("x", "NaN", "not finite").error_code(), "INVALID_VALUE");
        assert_eq!(PatioError::unknown_identity(ElementId(3)).error_code(), "UNKNOWN_IDENTITY");
        assert_eq!(PatioError::invalid_catalog("c", "empty").error_code(), "INVALID_CATALOG");
    }

    #[test]
    fn test_display_messages() {
        let err = PatioError::unknown_identity(ElementId(7));
        assert_eq!(err.to_string(), "Unknown element identity: 7");

        let err = PatioError::out_of_catalog_range("framing", 200.0, 184.0);
        assert_eq!(
            err.to_string(),
            "No stock size in 'framing' covers 200 mm (largest is 184 mm)"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(PatioError::unknown_identity(ElementId(1)).is_recoverable());
        assert!(!PatioError::internal("lock poisoned").is_recoverable());
    }
}
