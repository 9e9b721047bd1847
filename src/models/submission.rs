//! Submission model (`apps` collection)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time;
use super::{DofollowReason, LinkType, Plan, Pricing};

/// Lifecycle status of a submission
///
/// Exactly one status at a time:
/// draft -> pending -> scheduled -> live -> archived, with
/// pending -> rejected as the only path into the absorbing
/// rejected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Draft,
    Pending,
    Scheduled,
    Live,
    Rejected,
    Archived,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Scheduled => "scheduled",
            SubmissionStatus::Live => "live",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::Archived => "archived",
        }
    }
}

/// A user-submitted project entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,

    /// URL-safe identifier derived from the name, unique
    pub slug: String,

    pub name: String,
    pub short_description: String,
    pub website_url: String,

    /// Lower-cased host, "www." and trailing "/" stripped; unique,
    /// used for duplicate detection instead of scanning raw URLs
    pub website_url_normalized: String,

    pub logo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// 1-3 category labels
    pub categories: Vec<String>,
    pub pricing: Pricing,
    pub plan: Plan,

    pub submitted_by: String,
    pub contact_email: String,

    pub status: SubmissionStatus,
    pub is_draft: bool,
    pub approved: bool,
    pub payment_status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// Opaque competition id (not the human-readable week code)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_competition_id: Option<String>,
    pub entered_weekly: bool,
    pub weekly_competition_ended: bool,

    pub link_type: LinkType,
    /// Mirrors `link_type == dofollow`
    pub dofollow_status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dofollow_reason: Option<DofollowReason>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::rfc3339_opt")]
    pub dofollow_awarded_at: Option<DateTime<Utc>>,

    pub weekly_winner: bool,
    /// 1..=3 when the submission placed; absent otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_position: Option<u8>,

    pub views: i64,
    pub upvotes: i64,
    pub clicks: i64,
    /// views + upvotes + clicks
    pub total_engagement: i64,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::rfc3339_opt")]
    pub homepage_start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::rfc3339_opt")]
    pub homepage_end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::rfc3339_opt")]
    pub launch_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::rfc3339_opt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::rfc3339_opt")]
    pub launched_at: Option<DateTime<Utc>>,

    #[serde(with = "time::rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "time::rfc3339")]
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// A draft premium submission whose payment never completed;
    /// eligible for in-place resubmission by its owner
    pub fn is_abandoned_draft(&self) -> bool {
        self.is_draft || (self.plan == Plan::Premium && !self.payment_status)
    }

    /// Whether the submission currently carries dofollow status
    pub fn is_dofollow(&self) -> bool {
        self.link_type == LinkType::Dofollow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{from_document, to_document};
    use chrono::TimeZone;

    fn sample() -> Submission {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        Submission {
            id: "app-1".into(),
            slug: "my-project".into(),
            name: "My Project".into(),
            short_description: "A project".into(),
            website_url: "https://example.com".into(),
            website_url_normalized: "example.com".into(),
            logo_url: "https://example.com/logo.png".into(),
            video_url: None,
            categories: vec!["ai".into()],
            pricing: Pricing::Free,
            plan: Plan::Standard,
            submitted_by: "user-1".into(),
            contact_email: "a@example.com".into(),
            status: SubmissionStatus::Pending,
            is_draft: false,
            approved: false,
            payment_status: false,
            rejection_reason: None,
            weekly_competition_id: Some("comp-1".into()),
            entered_weekly: true,
            weekly_competition_ended: false,
            link_type: LinkType::Nofollow,
            dofollow_status: false,
            dofollow_reason: None,
            dofollow_awarded_at: None,
            weekly_winner: false,
            weekly_position: None,
            views: 0,
            upvotes: 0,
            clicks: 0,
            total_engagement: 0,
            homepage_start_date: None,
            homepage_end_date: Some(now + chrono::Duration::days(7)),
            launch_date: None,
            published_at: None,
            launched_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_absent_options_skip_serialization() {
        let doc = to_document(&sample()).unwrap();

        // Absent fields must be missing, not null, so $exists filters work
        assert!(doc.get("weekly_position").is_none());
        assert!(doc.get("rejection_reason").is_none());
        assert_eq!(doc["status"], "pending");
        assert_eq!(doc["homepage_end_date"], "2024-03-11T08:00:00Z");
    }

    #[test]
    fn test_document_round_trip() {
        let submission = sample();
        let doc = to_document(&submission).unwrap();
        let back: Submission = from_document(&doc).unwrap();

        assert_eq!(back.id, submission.id);
        assert_eq!(back.status, SubmissionStatus::Pending);
        assert_eq!(back.weekly_position, None);
        assert_eq!(back.created_at, submission.created_at);
    }

    #[test]
    fn test_abandoned_draft_rule() {
        let mut s = sample();
        assert!(!s.is_abandoned_draft());

        s.is_draft = true;
        assert!(s.is_abandoned_draft());

        s.is_draft = false;
        s.plan = Plan::Premium;
        s.payment_status = false;
        assert!(s.is_abandoned_draft());

        s.payment_status = true;
        assert!(!s.is_abandoned_draft());
    }
}
