//! # Voting Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for voting operations
pub type VoteResult<T> = Result<T, VoteError>;

/// Voting ledger errors
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("Submission not found: {0}")]
    SubmissionNotFound(String),

    #[error("Competition not found: {0}")]
    CompetitionNotFound(String),

    /// Only live submissions accept votes
    #[error("Submission is not live")]
    NotLive,

    /// The submission is not entered into any weekly competition
    #[error("Submission is not part of a weekly competition")]
    NoCompetition,

    /// The competition window is not currently open
    #[error("Voting for week {0} is closed")]
    VotingClosed(String),

    #[error("Already voted for this submission")]
    AlreadyVoted,

    #[error("No vote to remove")]
    NoVote,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VoteError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            VoteError::SubmissionNotFound(_) => "NOT_FOUND",
            VoteError::CompetitionNotFound(_) => "NOT_FOUND",
            VoteError::NotLive => "NOT_LIVE",
            VoteError::NoCompetition => "NO_COMPETITION",
            VoteError::VotingClosed(_) => "VOTING_CLOSED",
            VoteError::AlreadyVoted => "ALREADY_VOTED",
            VoteError::NoVote => "NO_VOTE",
            VoteError::Store(e) => e.code(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            VoteError::SubmissionNotFound(_) | VoteError::CompetitionNotFound(_) => 404,
            VoteError::NotLive
            | VoteError::NoCompetition
            | VoteError::VotingClosed(_)
            | VoteError::AlreadyVoted => 409,
            VoteError::NoVote => 404,
            VoteError::Store(e) => e.status_code(),
        }
    }
}
