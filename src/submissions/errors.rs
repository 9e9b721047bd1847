//! # Submission Errors

use thiserror::Error;

use crate::competitions::CompetitionError;
use crate::models::SubmissionStatus;
use crate::store::StoreError;

/// Result type for submission operations
pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Submission intake and review errors
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Required fields absent or empty
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("A logo is required")]
    MissingLogo,

    #[error("Invalid URL in {field}: {value}")]
    InvalidUrl { field: String, value: String },

    #[error("Between 1 and 3 categories required, got {0}")]
    InvalidCategories(usize),

    /// Rejection requires a non-empty reason
    #[error("A rejection reason is required")]
    MissingReason,

    /// Another user already holds this name
    #[error("A project named \"{existing_name}\" already uses slug {slug}")]
    SlugExists { slug: String, existing_name: String },

    /// Another user already submitted this website
    #[error("\"{existing_name}\" was already submitted for {url}")]
    WebsiteExists { url: String, existing_name: String },

    /// The operation is not legal from the submission's current status
    #[error("Cannot {event} a {status} submission", status = .from.as_str())]
    InvalidState {
        from: SubmissionStatus,
        event: &'static str,
    },

    #[error("Submission not found: {0}")]
    NotFound(String),

    #[error("Not allowed to modify this submission")]
    Forbidden,

    #[error(transparent)]
    Competition(#[from] CompetitionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmissionError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionError::MissingFields(_) => "MISSING_FIELDS",
            SubmissionError::MissingLogo => "MISSING_LOGO",
            SubmissionError::InvalidUrl { .. } => "INVALID_URL",
            SubmissionError::InvalidCategories(_) => "INVALID_CATEGORIES",
            SubmissionError::MissingReason => "MISSING_REASON",
            SubmissionError::SlugExists { .. } => "SLUG_EXISTS",
            SubmissionError::WebsiteExists { .. } => "WEBSITE_EXISTS",
            SubmissionError::InvalidState { .. } => "INVALID_STATE",
            SubmissionError::NotFound(_) => "NOT_FOUND",
            SubmissionError::Forbidden => "FORBIDDEN",
            SubmissionError::Competition(e) => e.code(),
            SubmissionError::Store(e) => e.code(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            SubmissionError::MissingFields(_)
            | SubmissionError::MissingLogo
            | SubmissionError::InvalidUrl { .. }
            | SubmissionError::InvalidCategories(_)
            | SubmissionError::MissingReason => 400,
            SubmissionError::SlugExists { .. }
            | SubmissionError::WebsiteExists { .. }
            | SubmissionError::InvalidState { .. } => 409,
            SubmissionError::NotFound(_) => 404,
            SubmissionError::Forbidden => 403,
            SubmissionError::Competition(e) => e.status_code(),
            SubmissionError::Store(e) => e.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_errors_name_the_conflict() {
        let err = SubmissionError::WebsiteExists {
            url: "example.com".into(),
            existing_name: "Existing App".into(),
        };
        assert_eq!(err.code(), "WEBSITE_EXISTS");
        assert!(err.to_string().contains("Existing App"));
    }

    #[test]
    fn test_week_full_passes_through() {
        let err = SubmissionError::Competition(CompetitionError::WeekFull {
            competition_id: "2024-W10".into(),
            plan: crate::models::Plan::Standard,
        });
        assert_eq!(err.code(), "WEEK_FULL");
        assert_eq!(err.status_code(), 409);
    }
}
