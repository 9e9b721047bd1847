//! Link-type change audit record (`link_type_changes` collection)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time;
use super::LinkType;

/// One link-type transition.
///
/// Append-only: records are never mutated or deleted, and every
/// actual transition produces exactly one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTypeChange {
    pub project_id: String,
    pub from_type: LinkType,
    pub to_type: LinkType,
    /// Acting admin's user id, or "system" for automatic awards
    pub changed_by: String,
    pub reason: String,
    #[serde(with = "time::rfc3339")]
    pub timestamp: DateTime<Utc>,
}
