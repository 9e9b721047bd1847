//! API error types
//!
//! API errors are pass-through: they preserve the stable codes from
//! the domain subsystems (submissions, voting, competitions, awards)
//! and only add envelope-level codes of their own.

use std::fmt;

use crate::awards::AwardError;
use crate::competitions::CompetitionError;
use crate::store::StoreError;
use crate::submissions::SubmissionError;
use crate::voting::VoteError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// An error ready for the response envelope
#[derive(Debug, Clone)]
pub struct ApiError {
    code: String,
    message: String,
    status: u16,
}

impl ApiError {
    /// Malformed request envelope
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self {
            code: "INVALID_REQUEST".to_string(),
            message: reason.into(),
            status: 400,
        }
    }

    /// Unknown `op` value
    pub fn unknown_operation(op: impl Into<String>) -> Self {
        Self {
            code: "UNKNOWN_OPERATION".to_string(),
            message: format!("Unknown operation: {}", op.into()),
            status: 400,
        }
    }

    /// Request carried no actor context
    pub fn unauthorized() -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: "An authenticated actor is required".to_string(),
            status: 401,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status a transport layer would use
    pub fn status(&self) -> u16 {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

macro_rules! pass_through {
    ($err:ty) => {
        impl From<$err> for ApiError {
            fn from(e: $err) -> Self {
                Self {
                    code: e.code().to_string(),
                    message: e.to_string(),
                    status: e.status_code(),
                }
            }
        }
    };
}

pass_through!(SubmissionError);
pass_through!(VoteError);
pass_through!(CompetitionError);
pass_through!(AwardError);
pass_through!(StoreError);
