//! Local validation failures.
//!
//! These are raised before any request is sent: a required form field is
//! empty, a page size is zero, an export would produce no rows.

use thiserror::Error;

/// A local constraint failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The filtered set is empty, so there is nothing to export.
    #[error("Nothing to export")]
    NothingToExport,

    /// A required field was left empty.
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// Page size must be at least one.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// A textual value could not be mapped onto a known variant.
    #[error("Unknown {kind}: '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    /// A numeric field was out of range or unparseable.
    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: &'static str, message: String },
}

impl ValidationError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::NothingToExport => {
                "Nothing to export: no diagnoses match the current filters.".to_string()
            }
            ValidationError::MissingField { field } => {
                format!("Please fill in the {} field.", field.replace('_', " "))
            }
            ValidationError::InvalidPageSize(_) => "Page size must be at least 1.".to_string(),
            ValidationError::UnknownValue { kind, value } => {
                format!("'{}' is not a valid {}.", value, kind)
            }
            ValidationError::InvalidField { field, message } => {
                format!("Invalid {}: {}", field.replace('_', " "), message)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::NothingToExport => "E_VAL_EMPTY_EXPORT",
            ValidationError::MissingField { .. } => "E_VAL_MISSING",
            ValidationError::InvalidPageSize(_) => "E_VAL_PAGE_SIZE",
            ValidationError::UnknownValue { .. } => "E_VAL_UNKNOWN",
            ValidationError::InvalidField { .. } => "E_VAL_FIELD",
        }
    }
}
