//! Shared fixtures for the invariant tests
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use launchboard::clock::FixedClock;
use launchboard::config::PlatformConfig;
use launchboard::models::{
    to_document, Competition, CompetitionKind, CompetitionStatus, LinkType, Plan, Pricing,
    Submission, SubmissionStatus,
};
use launchboard::platform::Platform;
use launchboard::store::{collections, DocumentStore, MemoryStore};
use launchboard::submissions::SubmitInput;

/// A Monday 00:00 UTC-8 (08:00 UTC), convenient as a week start
pub fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
}

pub fn platform_at(now: DateTime<Utc>) -> (Arc<Platform>, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(now));
    let platform = Platform::new(
        Arc::new(MemoryStore::new()),
        clock.clone(),
        PlatformConfig::default(),
    )
    .expect("platform assembles");
    (Arc::new(platform), clock)
}

/// Insert a weekly competition starting at `start` with the given
/// status and admitted-submission count
pub fn seed_week(
    platform: &Platform,
    code: &str,
    start: DateTime<Utc>,
    status: CompetitionStatus,
    total_submissions: i64,
) -> Competition {
    let competition = Competition {
        id: format!("comp-{code}"),
        competition_id: code.to_string(),
        kind: CompetitionKind::Weekly,
        start_date: start,
        end_date: start + Duration::days(7),
        status,
        total_submissions,
        standard_submissions: total_submissions,
        premium_submissions: 0,
        max_standard_slots: 15,
        max_premium_slots: 10,
        winner_id: None,
        runner_up_ids: Vec::new(),
        top_three_ids: Vec::new(),
        total_votes: 0,
        total_participants: 0,
        completed_at: None,
        created_at: start - Duration::days(30),
        updated_at: start - Duration::days(30),
    };
    platform
        .store
        .insert_one(
            collections::COMPETITIONS,
            to_document(&competition).unwrap(),
        )
        .unwrap();
    competition
}

/// Insert a submission already linked to a competition
pub fn seed_submission(
    platform: &Platform,
    id: &str,
    competition: &Competition,
    status: SubmissionStatus,
    upvotes: i64,
    created_at: DateTime<Utc>,
) -> Submission {
    let submission = Submission {
        id: id.to_string(),
        slug: id.to_string(),
        name: format!("Project {id}"),
        short_description: "A project".to_string(),
        website_url: format!("https://{id}.example.com"),
        website_url_normalized: format!("{id}.example.com"),
        logo_url: format!("https://{id}.example.com/logo.png"),
        video_url: None,
        categories: vec!["ai".to_string()],
        pricing: Pricing::Free,
        plan: Plan::Standard,
        submitted_by: format!("owner-{id}"),
        contact_email: format!("{id}@example.com"),
        status,
        is_draft: false,
        approved: status == SubmissionStatus::Live,
        payment_status: false,
        rejection_reason: None,
        weekly_competition_id: Some(competition.id.clone()),
        entered_weekly: true,
        weekly_competition_ended: false,
        link_type: LinkType::Nofollow,
        dofollow_status: false,
        dofollow_reason: None,
        dofollow_awarded_at: None,
        weekly_winner: false,
        weekly_position: None,
        views: 0,
        upvotes,
        clicks: 0,
        total_engagement: upvotes,
        homepage_start_date: None,
        homepage_end_date: None,
        launch_date: Some(competition.start_date),
        published_at: None,
        launched_at: None,
        created_at,
        updated_at: created_at,
    };
    platform
        .store
        .insert_one(collections::APPS, to_document(&submission).unwrap())
        .unwrap();
    submission
}

/// A valid submit payload for the given week
pub fn submit_input(name: &str, host: &str, plan: Plan, week_code: &str) -> SubmitInput {
    SubmitInput {
        name: name.to_string(),
        short_description: "Does something useful".to_string(),
        website_url: format!("https://{host}"),
        logo_url: format!("https://{host}/logo.png"),
        video_url: None,
        categories: vec!["ai".to_string(), "productivity".to_string()],
        contact_email: format!("team@{host}"),
        plan: Some(plan),
        pricing: Some(Pricing::Freemium),
        launch_week: week_code.to_string(),
    }
}

/// Read a submission document back as a typed model
pub fn fetch_submission(platform: &Platform, id: &str) -> Submission {
    let doc = platform
        .store
        .find_one(
            collections::APPS,
            &launchboard::store::Filter::new().eq("id", serde_json::json!(id)),
        )
        .unwrap()
        .expect("submission exists");
    launchboard::models::from_document(&doc).unwrap()
}

/// Read a competition document back as a typed model
pub fn fetch_competition(platform: &Platform, id: &str) -> Competition {
    let doc = platform
        .store
        .find_one(
            collections::COMPETITIONS,
            &launchboard::store::Filter::new().eq("id", serde_json::json!(id)),
        )
        .unwrap()
        .expect("competition exists");
    launchboard::models::from_document(&doc).unwrap()
}
