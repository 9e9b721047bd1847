//! # CLI Errors

use thiserror::Error;

use crate::competitions::CompetitionError;
use crate::config::ConfigError;
use crate::scheduler::SchedulerError;
use crate::store::StoreError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Competition(#[from] CompetitionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unknown plan tier: {0}")]
    UnknownPlan(String),
}
