//! Error types for the form engine

use thiserror::Error;

/// Form engine error type
///
/// Validation failures are not errors: they come back as
/// [`ValidationErrors`](crate::ValidationErrors) inside a result value.
#[derive(Error, Debug)]
pub enum FormsError {
    /// Definition or submission could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Definition is structurally usable but cannot be saved
    #[error("invalid form definition: {0}")]
    InvalidDefinition(String),

    /// Submission value outside the supported value shapes
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Field lookup by id or position failed
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// File rejected at the upload boundary
    #[error("{0}")]
    UploadRejected(String),
}

/// Result type for the form engine
pub type Result<T> = std::result::Result<T, FormsError>;
