//! Store error types

use thiserror::Error;
use tracker_model::{ResourceRef, ValidationErrors};

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record failed validation; nothing was written
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The record to change does not exist
    #[error("Record not found: {0}")]
    NotFound(ResourceRef),

    /// A stored row could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store cannot serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
