//! Slot ceiling invariant tests
//!
//! At all times: standard admissions <= 15 and total admissions <= 25
//! per week, including under concurrent submission attempts.

mod support;

use std::sync::Arc;
use std::thread;

use chrono::Duration;
use launchboard::auth::Actor;
use launchboard::models::{CompetitionStatus, Plan, SubmissionStatus};
use support::{fetch_competition, monday, platform_at, seed_week, submit_input};

// =============================================================================
// CONCURRENT ADMISSION
// =============================================================================

/// With one slot left, N concurrent standard submissions produce
/// exactly one success and N-1 WEEK_FULL failures.
#[test]
fn test_last_slot_goes_to_exactly_one_submitter() {
    let now = monday() + Duration::hours(1);
    let (platform, _clock) = platform_at(now);
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 14);

    let threads: Vec<_> = (0..8)
        .map(|i| {
            let platform = Arc::clone(&platform);
            thread::spawn(move || {
                let actor = Actor::user(format!("user-{i}"));
                let input = submit_input(
                    &format!("Racer {i}"),
                    &format!("racer{i}.example.com"),
                    Plan::Standard,
                    "2024-W10",
                );
                platform.intake.submit(&actor, input)
            })
        })
        .collect();

    let results: Vec<_> = threads.into_iter().map(|t| t.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let week_full = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.code() == "WEEK_FULL"))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(week_full, 7);

    let competition = fetch_competition(&platform, "comp-2024-W10");
    assert_eq!(competition.total_submissions, 15);
}

// =============================================================================
// TIER CEILINGS
// =============================================================================

/// A full shared tier rejects standard but still admits premium, up
/// to the combined ceiling of 25.
#[test]
fn test_week_full_for_standard_still_open_for_premium() {
    let now = monday() + Duration::hours(1);
    let (platform, _clock) = platform_at(now);
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 15);

    let standard = platform.intake.submit(
        &Actor::user("user-s"),
        submit_input("Standard App", "standard.example.com", Plan::Standard, "2024-W10"),
    );
    assert_eq!(standard.unwrap_err().code(), "WEEK_FULL");

    // Premium intake is a draft and must not consume a slot yet
    let premium = platform
        .intake
        .submit(
            &Actor::user("user-p"),
            submit_input("Premium App", "premium.example.com", Plan::Premium, "2024-W10"),
        )
        .unwrap();
    assert_eq!(premium.status, SubmissionStatus::Draft);
    assert_eq!(
        fetch_competition(&platform, "comp-2024-W10").total_submissions,
        15
    );

    // Payment confirmation claims the premium-only slot
    let confirmed = platform
        .intake
        .confirm_payment(&Actor::user("user-p"), &premium.id)
        .unwrap();
    assert!(confirmed.payment_status);
    assert_eq!(
        fetch_competition(&platform, "comp-2024-W10").total_submissions,
        16
    );
}

/// The combined ceiling stops premium admission at 25.
#[test]
fn test_premium_ceiling_at_twenty_five() {
    let now = monday() + Duration::hours(1);
    let (platform, _clock) = platform_at(now);
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 25);

    let premium = platform
        .intake
        .submit(
            &Actor::user("user-p"),
            submit_input("Late Premium", "late.example.com", Plan::Premium, "2024-W10"),
        )
        .unwrap();

    // The draft is created, but its payment cannot claim a slot
    let err = platform
        .intake
        .confirm_payment(&Actor::user("user-p"), &premium.id)
        .unwrap_err();
    assert_eq!(err.code(), "WEEK_FULL");

    let competition = fetch_competition(&platform, "comp-2024-W10");
    assert_eq!(competition.total_submissions, 25);
}

/// Concurrent payment confirmations race for the last premium slot.
#[test]
fn test_concurrent_payment_confirmations_respect_ceiling() {
    let now = monday() + Duration::hours(1);
    let (platform, _clock) = platform_at(now);
    seed_week(&platform, "2024-W10", monday(), CompetitionStatus::Active, 24);

    let mut drafts = Vec::new();
    for i in 0..4 {
        let receipt = platform
            .intake
            .submit(
                &Actor::user(format!("payer-{i}")),
                submit_input(
                    &format!("Paid {i}"),
                    &format!("paid{i}.example.com"),
                    Plan::Premium,
                    "2024-W10",
                ),
            )
            .unwrap();
        drafts.push((format!("payer-{i}"), receipt.id));
    }

    let threads: Vec<_> = drafts
        .into_iter()
        .map(|(user, id)| {
            let platform = Arc::clone(&platform);
            thread::spawn(move || platform.intake.confirm_payment(&Actor::user(user), &id))
        })
        .collect();
    let results: Vec<_> = threads.into_iter().map(|t| t.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        fetch_competition(&platform, "comp-2024-W10").total_submissions,
        25
    );
}
