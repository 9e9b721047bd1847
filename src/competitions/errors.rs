//! # Competition Errors

use thiserror::Error;

use crate::awards::AwardError;
use crate::models::Plan;
use crate::store::StoreError;

/// Result type for competition operations
pub type CompetitionResult<T> = Result<T, CompetitionError>;

/// Competition lifecycle and slot allocation errors
#[derive(Debug, Error)]
pub enum CompetitionError {
    #[error("Competition not found: {0}")]
    NotFound(String),

    /// No slot left for the plan tier in the chosen week
    #[error("Week {competition_id} is full for {tier} submissions", tier = .plan.as_str())]
    WeekFull {
        competition_id: String,
        plan: Plan,
    },

    /// The chosen week already completed or was cancelled
    #[error("Week {0} is closed for submissions")]
    WeekClosed(String),

    #[error(transparent)]
    Award(#[from] AwardError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CompetitionError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CompetitionError::NotFound(_) => "NOT_FOUND",
            CompetitionError::WeekFull { .. } => "WEEK_FULL",
            CompetitionError::WeekClosed(_) => "WEEK_CLOSED",
            CompetitionError::Award(e) => e.code(),
            CompetitionError::Store(e) => e.code(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            CompetitionError::NotFound(_) => 404,
            CompetitionError::WeekFull { .. } => 409,
            CompetitionError::WeekClosed(_) => 409,
            CompetitionError::Award(e) => e.status_code(),
            CompetitionError::Store(e) => e.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_full_names_the_week() {
        let err = CompetitionError::WeekFull {
            competition_id: "2024-W10".into(),
            plan: Plan::Standard,
        };
        assert_eq!(err.code(), "WEEK_FULL");
        assert!(err.to_string().contains("2024-W10"));
        assert!(err.to_string().contains("standard"));
    }
}
