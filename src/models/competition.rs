//! Competition model (`competitions` collection)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time;

/// Competition cadence; only weekly contests are modeled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionKind {
    Weekly,
}

impl CompetitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionKind::Weekly => "weekly",
        }
    }
}

/// Competition status.
///
/// Derived from wall-clock time relative to the window, except
/// completed and cancelled which are sticky once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl CompetitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionStatus::Upcoming => "upcoming",
            CompetitionStatus::Active => "active",
            CompetitionStatus::Completed => "completed",
            CompetitionStatus::Cancelled => "cancelled",
        }
    }
}

/// A time-boxed weekly contest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    /// Opaque unique id; submissions reference this
    pub id: String,

    /// Human-readable week code, e.g. "2024-W01"; unique within kind
    pub competition_id: String,

    #[serde(rename = "type")]
    pub kind: CompetitionKind,

    #[serde(with = "time::rfc3339")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "time::rfc3339")]
    pub end_date: DateTime<Utc>,

    pub status: CompetitionStatus,

    pub total_submissions: i64,
    pub standard_submissions: i64,
    pub premium_submissions: i64,

    /// Shared slots; standard admission stops here
    pub max_standard_slots: i64,
    /// Additional premium-only allowance above the shared slots
    pub max_premium_slots: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
    #[serde(default)]
    pub runner_up_ids: Vec<String>,
    #[serde(default)]
    pub top_three_ids: Vec<String>,

    pub total_votes: i64,
    pub total_participants: i64,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::rfc3339_opt")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(with = "time::rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "time::rfc3339")]
    pub updated_at: DateTime<Utc>,
}

impl Competition {
    /// Total slot ceiling for a plan tier.
    ///
    /// Standard and premium share slots up to `max_standard_slots`;
    /// premium may continue into the premium-only allowance.
    pub fn slot_ceiling(&self, plan: super::Plan) -> i64 {
        match plan {
            super::Plan::Standard => self.max_standard_slots,
            super::Plan::Premium => self.max_standard_slots + self.max_premium_slots,
        }
    }

    /// Whether an instant falls inside the voting window [start, end]
    pub fn window_contains(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at && at <= self.end_date
    }
}
