//! Submission state machine tests
//!
//! Reachability rules, the resubmission-as-update rule for abandoned
//! drafts, and review routing.

mod support;

use chrono::Duration;
use launchboard::auth::Actor;
use launchboard::models::{
    CompetitionStatus, DofollowReason, Plan, SubmissionStatus,
};
use launchboard::store::{collections, Filter};
use launchboard::submissions::ReviewAction;
use serde_json::json;
use support::{
    fetch_competition, fetch_submission, monday, platform_at, seed_week, submit_input,
};

// =============================================================================
// INTAKE
// =============================================================================

#[test]
fn test_standard_intake_goes_pending() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);

    let receipt = platform
        .intake
        .submit(
            &Actor::user("user-1"),
            submit_input("My Tool", "mytool.example.com", Plan::Standard, "2024-W10"),
        )
        .unwrap();

    assert_eq!(receipt.status, SubmissionStatus::Pending);
    assert_eq!(receipt.slug, "my-tool");

    let submission = fetch_submission(&platform, &receipt.id);
    assert!(!submission.is_draft);
    assert!(submission.entered_weekly);
    assert_eq!(submission.upvotes, 0);
    assert_eq!(fetch_competition(&platform, "comp-2024-W10").total_submissions, 1);

    // The non-draft path counts on the submitter's lifetime counter
    let user = platform
        .store
        .find_one(collections::USERS, &Filter::new().eq("id", json!("user-1")))
        .unwrap()
        .unwrap();
    assert_eq!(user["total_submissions"], 1);
}

#[test]
fn test_premium_intake_stays_draft() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);

    let receipt = platform
        .intake
        .submit(
            &Actor::user("user-1"),
            submit_input("Premium Tool", "premium.example.com", Plan::Premium, "2024-W10"),
        )
        .unwrap();

    assert_eq!(receipt.status, SubmissionStatus::Draft);
    let submission = fetch_submission(&platform, &receipt.id);
    assert!(submission.is_draft);
    assert!(!submission.payment_status);
    assert!(!submission.entered_weekly);
    assert_eq!(fetch_competition(&platform, "comp-2024-W10").total_submissions, 0);
}

#[test]
fn test_validation_errors() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);
    let actor = Actor::user("user-1");

    let mut input = submit_input("App", "app.example.com", Plan::Standard, "2024-W10");
    input.name = String::new();
    input.contact_email = String::new();
    let err = platform.intake.submit(&actor, input).unwrap_err();
    assert_eq!(err.code(), "MISSING_FIELDS");
    assert!(err.to_string().contains("name"));
    assert!(err.to_string().contains("contact_email"));

    let mut input = submit_input("App", "app.example.com", Plan::Standard, "2024-W10");
    input.logo_url = String::new();
    let err = platform.intake.submit(&actor, input).unwrap_err();
    assert_eq!(err.code(), "MISSING_LOGO");

    let mut input = submit_input("App", "app.example.com", Plan::Standard, "2024-W10");
    input.website_url = "not-a-url".to_string();
    let err = platform.intake.submit(&actor, input).unwrap_err();
    assert_eq!(err.code(), "INVALID_URL");

    let mut input = submit_input("App", "app.example.com", Plan::Standard, "2024-W10");
    input.categories = vec!["a".into(), "b".into(), "c".into(), "d".into()];
    let err = platform.intake.submit(&actor, input).unwrap_err();
    assert_eq!(err.code(), "INVALID_CATEGORIES");
}

// =============================================================================
// RESUBMISSION RULE
// =============================================================================

/// Resubmitting an abandoned premium draft updates the existing row
/// (same id), does not raise duplicate errors, and still consumes no
/// slot.
#[test]
fn test_premium_draft_resubmission_updates_in_place() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);
    let actor = Actor::user("user-1");

    let first = platform
        .intake
        .submit(
            &actor,
            submit_input("My Startup", "mystartup.example.com", Plan::Premium, "2024-W10"),
        )
        .unwrap();

    // Same website, new description after the payment failed
    let mut retry = submit_input("My Startup v2", "mystartup.example.com", Plan::Premium, "2024-W10");
    retry.short_description = "Sharper pitch".to_string();
    let second = platform.intake.submit(&actor, retry).unwrap();

    assert_eq!(second.id, first.id);
    let rows = platform
        .store
        .count(
            collections::APPS,
            &Filter::new().eq("website_url_normalized", json!("mystartup.example.com")),
        )
        .unwrap();
    assert_eq!(rows, 1);

    let submission = fetch_submission(&platform, &first.id);
    assert_eq!(submission.short_description, "Sharper pitch");
    assert_eq!(submission.slug, "my-startup-v2");
    assert_eq!(fetch_competition(&platform, "comp-2024-W10").total_submissions, 0);
}

/// The same website from a different user is a conflict that names
/// the existing project.
#[test]
fn test_duplicate_website_from_other_user_rejected() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);

    platform
        .intake
        .submit(
            &Actor::user("user-1"),
            submit_input("Original", "shared.example.com", Plan::Standard, "2024-W10"),
        )
        .unwrap();

    let err = platform
        .intake
        .submit(
            &Actor::user("user-2"),
            // Equivalent URL spelled differently
            {
                let mut input =
                    submit_input("Copycat", "shared.example.com", Plan::Standard, "2024-W10");
                input.website_url = "http://www.SHARED.example.com/".to_string();
                input
            },
        )
        .unwrap_err();

    assert_eq!(err.code(), "WEBSITE_EXISTS");
    assert!(err.to_string().contains("Original"));
}

/// A non-draft standard submission is not resubmittable: the name
/// collision surfaces as SLUG_EXISTS.
#[test]
fn test_live_submission_not_resubmittable() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);
    let actor = Actor::user("user-1");

    platform
        .intake
        .submit(
            &actor,
            submit_input("My Tool", "mytool.example.com", Plan::Standard, "2024-W10"),
        )
        .unwrap();

    let err = platform
        .intake
        .submit(
            &actor,
            submit_input("My Tool", "othersite.example.com", Plan::Standard, "2024-W10"),
        )
        .unwrap_err();
    assert_eq!(err.code(), "SLUG_EXISTS");
}

// =============================================================================
// PAYMENT CONFIRMATION
// =============================================================================

/// Paying against an upcoming week schedules; paying against an
/// active week queues for review.
#[test]
fn test_payment_routing() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);
    seed_week(
        &platform,
        "2024-W11",
        monday() + Duration::days(7),
        CompetitionStatus::Upcoming,
        0,
    );
    let actor = Actor::user("user-1");

    let upcoming = platform
        .intake
        .submit(
            &actor,
            submit_input("Future App", "future.example.com", Plan::Premium, "2024-W11"),
        )
        .unwrap();
    let confirmed = platform.intake.confirm_payment(&actor, &upcoming.id).unwrap();
    assert_eq!(confirmed.status, SubmissionStatus::Scheduled);
    assert!(confirmed.approved);
    assert!(confirmed.payment_status);
    assert!(!confirmed.is_draft);

    let active = platform
        .intake
        .submit(
            &actor,
            submit_input("Now App", "nowapp.example.com", Plan::Premium, "2024-W10"),
        )
        .unwrap();
    let confirmed = platform.intake.confirm_payment(&actor, &active.id).unwrap();
    assert_eq!(confirmed.status, SubmissionStatus::Pending);
    assert!(!confirmed.approved);
}

#[test]
fn test_payment_confirmation_idempotent_and_guarded() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);
    let owner = Actor::user("user-1");

    let receipt = platform
        .intake
        .submit(
            &owner,
            submit_input("Paid App", "paid.example.com", Plan::Premium, "2024-W10"),
        )
        .unwrap();

    // Someone else cannot confirm
    let err = platform
        .intake
        .confirm_payment(&Actor::user("user-2"), &receipt.id)
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    platform.intake.confirm_payment(&owner, &receipt.id).unwrap();
    // A retry is a no-op, not a double slot claim
    platform.intake.confirm_payment(&owner, &receipt.id).unwrap();
    assert_eq!(fetch_competition(&platform, "comp-2024-W10").total_submissions, 1);
}

// =============================================================================
// REVIEW
// =============================================================================

#[test]
fn test_reject_requires_reason_and_is_absorbing() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);
    let admin = Actor::admin("admin-1");

    let receipt = platform
        .intake
        .submit(
            &Actor::user("user-1"),
            submit_input("Sketchy App", "sketchy.example.com", Plan::Standard, "2024-W10"),
        )
        .unwrap();

    let err = platform
        .reviewer
        .review(&admin, &receipt.id, ReviewAction::Reject, None)
        .unwrap_err();
    assert_eq!(err.code(), "MISSING_REASON");

    let rejected = platform
        .reviewer
        .review(&admin, &receipt.id, ReviewAction::Reject, Some("spam"))
        .unwrap();
    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("spam"));

    // Rejected is absorbing: no way back through review
    let err = platform
        .reviewer
        .review(&admin, &receipt.id, ReviewAction::Approve, None)
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_STATE");
}

/// Approval routes by competition status, and a draft can never be
/// reviewed straight to live.
#[test]
fn test_approve_routing_and_draft_unreachable() {
    let now = monday() + Duration::hours(1);
    let (platform, _clock) = platform_at(now);
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);
    seed_week(
        &platform,
        "2024-W11",
        monday() + Duration::days(7),
        CompetitionStatus::Upcoming,
        0,
    );
    let admin = Actor::admin("admin-1");

    // Active week: approval publishes immediately
    let receipt = platform
        .intake
        .submit(
            &Actor::user("user-1"),
            submit_input("Live Now", "livenow.example.com", Plan::Standard, "2024-W10"),
        )
        .unwrap();
    let approved = platform
        .reviewer
        .review(&admin, &receipt.id, ReviewAction::Approve, None)
        .unwrap();
    assert_eq!(approved.status, SubmissionStatus::Live);
    assert_eq!(approved.published_at, Some(now));
    assert_eq!(approved.launched_at, Some(now));

    // Upcoming week: approval schedules, no publish timestamps
    let receipt = platform
        .intake
        .submit(
            &Actor::user("user-2"),
            submit_input("Later App", "later.example.com", Plan::Standard, "2024-W11"),
        )
        .unwrap();
    let scheduled = platform
        .reviewer
        .review(&admin, &receipt.id, ReviewAction::Approve, None)
        .unwrap();
    assert_eq!(scheduled.status, SubmissionStatus::Scheduled);
    assert!(scheduled.published_at.is_none());

    // A premium draft cannot be reviewed at all
    let draft = platform
        .intake
        .submit(
            &Actor::user("user-3"),
            submit_input("Draft App", "draftapp.example.com", Plan::Premium, "2024-W10"),
        )
        .unwrap();
    let err = platform
        .reviewer
        .review(&admin, &draft.id, ReviewAction::Approve, None)
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_STATE");
}

/// Premium approval grants dofollow with the premium_plan reason and
/// journals the transition.
#[test]
fn test_premium_approval_grants_dofollow() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);
    let owner = Actor::user("user-1");
    let admin = Actor::admin("admin-1");

    let receipt = platform
        .intake
        .submit(
            &owner,
            submit_input("Premium App", "premapp.example.com", Plan::Premium, "2024-W10"),
        )
        .unwrap();
    platform.intake.confirm_payment(&owner, &receipt.id).unwrap();

    let approved = platform
        .reviewer
        .review(&admin, &receipt.id, ReviewAction::Approve, None)
        .unwrap();
    assert_eq!(approved.status, SubmissionStatus::Live);
    assert!(approved.is_dofollow());
    assert_eq!(approved.dofollow_reason, Some(DofollowReason::PremiumPlan));

    let changes = platform.journal.for_project(&receipt.id).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].reason, "premium_plan");
    assert_eq!(changes[0].changed_by, "admin-1");
}

#[test]
fn test_non_admin_cannot_review() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);

    let receipt = platform
        .intake
        .submit(
            &Actor::user("user-1"),
            submit_input("An App", "anapp.example.com", Plan::Standard, "2024-W10"),
        )
        .unwrap();

    let err = platform
        .reviewer
        .review(
            &Actor::user("user-1"),
            &receipt.id,
            ReviewAction::Approve,
            None,
        )
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

// =============================================================================
// DRAFT DELETION
// =============================================================================

#[test]
fn test_only_drafts_can_be_deleted() {
    let (platform, _clock) = platform_at(monday() + Duration::hours(1));
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 0);
    let owner = Actor::user("user-1");

    let draft = platform
        .intake
        .submit(
            &owner,
            submit_input("Draft App", "draftdel.example.com", Plan::Premium, "2024-W10"),
        )
        .unwrap();
    platform.intake.delete_draft(&owner, &draft.id).unwrap();
    assert_eq!(
        platform
            .store
            .count(collections::APPS, &Filter::new().eq("id", json!(draft.id)))
            .unwrap(),
        0
    );

    let pending = platform
        .intake
        .submit(
            &owner,
            submit_input("Kept App", "keptapp.example.com", Plan::Standard, "2024-W10"),
        )
        .unwrap();
    let err = platform.intake.delete_draft(&owner, &pending.id).unwrap_err();
    assert_eq!(err.code(), "INVALID_STATE");
}
