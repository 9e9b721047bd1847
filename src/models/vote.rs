//! Vote model (`votes` collection)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time;

/// Vote kind; only upvotes exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Upvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
        }
    }
}

/// One user's endorsement of one submission.
///
/// At most one per (user_id, app_id) pair, enforced by a unique
/// compound index. Created and deleted, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: String,
    pub user_id: String,
    pub app_id: String,
    pub weekly_competition_id: String,
    pub vote_type: VoteType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(with = "time::rfc3339")]
    pub created_at: DateTime<Utc>,
}
