//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A unique index rejected an insert or update
    #[error("Unique index violation on {collection} ({list})", list = .fields.join(", "))]
    UniqueViolation {
        collection: String,
        fields: Vec<String>,
    },

    /// Document is not a JSON object or failed (de)serialization
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::UniqueViolation { .. } => "CONFLICT",
            StoreError::InvalidDocument(_) => "INVALID_DOCUMENT",
            StoreError::Internal(_) => "STORE_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::UniqueViolation { .. } => 409,
            StoreError::InvalidDocument(_) => 400,
            StoreError::Internal(_) => 500,
        }
    }
}
