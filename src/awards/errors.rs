//! # Award Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for award operations
pub type AwardResult<T> = Result<T, AwardError>;

/// Award engine and link-type management errors
#[derive(Debug, Error)]
pub enum AwardError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Admin authority required")]
    Forbidden,

    #[error("Invalid winner position: {0} (must be 1-3)")]
    InvalidPosition(u8),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AwardError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AwardError::NotFound(_) => "NOT_FOUND",
            AwardError::Forbidden => "FORBIDDEN",
            AwardError::InvalidPosition(_) => "INVALID_POSITION",
            AwardError::Store(e) => e.code(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AwardError::NotFound(_) => 404,
            AwardError::Forbidden => 403,
            AwardError::InvalidPosition(_) => 400,
            AwardError::Store(e) => e.status_code(),
        }
    }
}
