//! User profile model (`users` collection)
//!
//! Identity and session handling live with the external auth
//! provider; this row only carries the server-maintained counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time;

/// Counter-bearing user row, created lazily on first counted action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub total_votes: i64,
    pub total_submissions: i64,
    #[serde(with = "time::rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "time::rfc3339")]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// A fresh profile with zeroed counters
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            total_votes: 0,
            total_submissions: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
