//! Typed documents
//!
//! Every collection has a typed model with a closed set of enum
//! fields, converted to/from store documents at the service boundary.
//! Status and classification fields that were free-form strings in
//! earlier iterations are enums here so illegal states are
//! unrepresentable.

mod competition;
mod link_type_change;
mod submission;
pub mod time;
mod user;
mod vote;
mod webhook_log;

pub use competition::{Competition, CompetitionKind, CompetitionStatus};
pub use link_type_change::LinkTypeChange;
pub use submission::{Submission, SubmissionStatus};
pub use user::UserProfile;
pub use vote::{Vote, VoteType};
pub use webhook_log::WebhookLog;

use serde::{Deserialize, Serialize};

use crate::store::{Document, StoreError, StoreResult};

/// Plan tier for a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Standard,
    Premium,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Standard => "standard",
            Plan::Premium => "premium",
        }
    }
}

/// Pricing model of the submitted project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pricing {
    Free,
    Freemium,
    Paid,
}

impl Pricing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pricing::Free => "free",
            Pricing::Freemium => "freemium",
            Pricing::Paid => "paid",
        }
    }
}

/// SEO link treatment for a submission's backlink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Nofollow,
    Dofollow,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Nofollow => "nofollow",
            LinkType::Dofollow => "dofollow",
        }
    }
}

/// Why a submission holds dofollow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DofollowReason {
    WeeklyWinner,
    ManualUpgrade,
    PremiumPlan,
}

impl DofollowReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DofollowReason::WeeklyWinner => "weekly_winner",
            DofollowReason::ManualUpgrade => "manual_upgrade",
            DofollowReason::PremiumPlan => "premium_plan",
        }
    }
}

/// Serialize a typed model into a store document
pub fn to_document<T: Serialize>(model: &T) -> StoreResult<Document> {
    serde_json::to_value(model).map_err(|e| StoreError::InvalidDocument(e.to_string()))
}

/// Deserialize a store document into a typed model
pub fn from_document<T: for<'de> Deserialize<'de>>(doc: &Document) -> StoreResult<T> {
    serde_json::from_value(doc.clone()).map_err(|e| StoreError::InvalidDocument(e.to_string()))
}
