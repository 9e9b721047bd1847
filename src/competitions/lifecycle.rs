//! Competition lifecycle management
//!
//! Maintains the rolling horizon of future weekly competitions and
//! keeps every competition's status consistent with wall-clock time,
//! cascading status changes to linked submissions. Invoked on a
//! schedule (see `scheduler`), never from read paths.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use super::errors::{CompetitionError, CompetitionResult};
use super::slots::{SlotAllocator, SlotAvailability};
use super::week;
use crate::awards::AwardEngine;
use crate::clock::Clock;
use crate::config::PlatformConfig;
use crate::models::{
    from_document, time, to_document, Competition, CompetitionKind, CompetitionStatus, Plan,
};
use crate::observability::Logger;
use crate::store::{collections, DocumentStore, Filter, FindOptions, SortSpec, Update};

/// What one reconciliation pass did
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Week codes transitioned active -> completed
    pub completed: Vec<String>,

    /// Week codes transitioned upcoming -> active
    pub activated: Vec<String>,

    /// Competitions whose cascade failed (logged, others unaffected)
    pub failures: usize,
}

/// One week's capacity as seen by a plan tier
#[derive(Debug, Clone, Serialize)]
pub struct WeekAvailability {
    pub id: String,
    pub competition_id: String,
    pub start_date: String,
    pub end_date: String,
    pub status: CompetitionStatus,
    pub available: bool,
    pub remaining: i64,
}

/// Creates weekly competitions ahead of time and advances their status
pub struct LifecycleManager {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    config: PlatformConfig,
    awards: AwardEngine,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        config: PlatformConfig,
        awards: AwardEngine,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            awards,
        }
    }

    /// Top up the rolling horizon of future weeks.
    ///
    /// The sequence continues from the latest existing week rather
    /// than restarting from "now", so irregular invocation never
    /// produces gaps or duplicate week numbers. Idempotent per week
    /// code.
    pub fn ensure_upcoming_weeks(&self) -> CompetitionResult<Vec<Competition>> {
        let now = self.clock.now();

        let existing = self.store.count(
            collections::COMPETITIONS,
            &Filter::new()
                .eq("type", json!("weekly"))
                .is_in("status", vec![json!("active"), json!("upcoming")])
                .gte("start_date", json!(time::format(now))),
        )?;
        if existing >= self.config.horizon_weeks {
            return Ok(Vec::new());
        }
        let deficit = self.config.horizon_weeks - existing;

        let anchor = week::next_monday(now);
        let latest = self.store.find(
            collections::COMPETITIONS,
            &Filter::new().eq("type", json!("weekly")),
            &FindOptions::new().sort(SortSpec::desc("start_date")).limit(1),
        )?;
        let mut cursor = match latest.first() {
            Some(doc) => {
                let comp: Competition = from_document(doc)?;
                let following = week::following_week(comp.start_date);
                if following > anchor {
                    following
                } else {
                    anchor
                }
            }
            None => anchor,
        };

        let mut created = Vec::new();
        for _ in 0..deficit {
            let code = week::week_code(cursor);
            let exists = self.store.find_one(
                collections::COMPETITIONS,
                &Filter::new()
                    .eq("type", json!("weekly"))
                    .eq("competition_id", json!(code)),
            )?;
            if exists.is_none() {
                let competition = self.new_week(cursor, code.clone(), now);
                self.store
                    .insert_one(collections::COMPETITIONS, to_document(&competition)?)?;
                Logger::info("COMPETITION_CREATED", &[("week", &code)]);
                created.push(competition);
            }
            cursor = week::following_week(cursor);
        }
        Ok(created)
    }

    fn new_week(&self, start: DateTime<Utc>, code: String, now: DateTime<Utc>) -> Competition {
        Competition {
            id: Uuid::new_v4().to_string(),
            competition_id: code,
            kind: CompetitionKind::Weekly,
            start_date: start,
            end_date: week::week_end(start),
            status: CompetitionStatus::Upcoming,
            total_submissions: 0,
            standard_submissions: 0,
            premium_submissions: 0,
            max_standard_slots: self.config.max_standard_slots,
            max_premium_slots: self.config.max_premium_slots,
            winner_id: None,
            runner_up_ids: Vec::new(),
            top_three_ids: Vec::new(),
            total_votes: 0,
            total_participants: 0,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Advance competition statuses to match the clock.
    ///
    /// Each competition's cascade is processed independently; one
    /// failure is logged and does not block the others. Re-running is
    /// harmless: the status transitions are conditional writes that
    /// succeed for exactly one caller.
    pub fn reconcile_statuses(&self) -> CompetitionResult<ReconcileReport> {
        let now = self.clock.now();
        let mut report = ReconcileReport::default();

        // Close competitions whose window has passed
        let ended = self.store.find(
            collections::COMPETITIONS,
            &Filter::new()
                .eq("type", json!("weekly"))
                .eq("status", json!("active"))
                .lt("end_date", json!(time::format(now))),
            &FindOptions::new().sort(SortSpec::asc("end_date")),
        )?;
        for doc in &ended {
            match from_document::<Competition>(doc)
                .map_err(CompetitionError::from)
                .and_then(|comp| self.close_competition(comp, now))
            {
                Ok(Some(code)) => report.completed.push(code),
                Ok(None) => {}
                Err(e) => {
                    report.failures += 1;
                    Logger::error("COMPETITION_CLOSE_FAILED", &[("error", &e.to_string())]);
                }
            }
        }

        // Activate competitions whose window has opened
        let starting = self.store.find(
            collections::COMPETITIONS,
            &Filter::new()
                .eq("type", json!("weekly"))
                .eq("status", json!("upcoming"))
                .lte("start_date", json!(time::format(now)))
                .gt("end_date", json!(time::format(now))),
            &FindOptions::new().sort(SortSpec::asc("start_date")),
        )?;
        for doc in &starting {
            match from_document::<Competition>(doc)
                .map_err(CompetitionError::from)
                .and_then(|comp| self.activate_competition(comp, now))
            {
                Ok(Some(code)) => report.activated.push(code),
                Ok(None) => {}
                Err(e) => {
                    report.failures += 1;
                    Logger::error("COMPETITION_ACTIVATE_FAILED", &[("error", &e.to_string())]);
                }
            }
        }

        Ok(report)
    }

    /// Complete a competition and award its winners.
    ///
    /// The active -> completed transition is the mutex: the
    /// conditional write succeeds for exactly one caller, and only
    /// that caller runs the award engine.
    fn close_competition(
        &self,
        competition: Competition,
        now: DateTime<Utc>,
    ) -> CompetitionResult<Option<String>> {
        let gate = self.store.update_one(
            collections::COMPETITIONS,
            &Filter::new()
                .eq("id", json!(competition.id))
                .eq("status", json!("active")),
            &Update::new()
                .set("status", json!("completed"))
                .set("completed_at", json!(time::format(now)))
                .set("updated_at", json!(time::format(now))),
        )?;
        if gate.matched == 0 {
            return Ok(None);
        }

        let summary = self.awards.award_winners(&competition)?;
        Logger::info(
            "COMPETITION_COMPLETED",
            &[
                ("participants", &summary.participants.to_string()),
                ("week", &competition.competition_id),
            ],
        );
        Ok(Some(competition.competition_id))
    }

    /// Open a competition and publish its scheduled submissions
    fn activate_competition(
        &self,
        competition: Competition,
        now: DateTime<Utc>,
    ) -> CompetitionResult<Option<String>> {
        let gate = self.store.update_one(
            collections::COMPETITIONS,
            &Filter::new()
                .eq("id", json!(competition.id))
                .eq("status", json!("upcoming")),
            &Update::new()
                .set("status", json!("active"))
                .set("updated_at", json!(time::format(now))),
        )?;
        if gate.matched == 0 {
            return Ok(None);
        }

        let activated = self.store.update_many(
            collections::APPS,
            &Filter::new()
                .eq("weekly_competition_id", json!(competition.id))
                .eq("status", json!("scheduled")),
            &Update::new()
                .set("status", json!("live"))
                .set("published_at", json!(time::format(now)))
                .set("launched_at", json!(time::format(now)))
                .set("updated_at", json!(time::format(now))),
        )?;

        Logger::info(
            "COMPETITION_ACTIVATED",
            &[
                ("submissions_activated", &activated.matched.to_string()),
                ("week", &competition.competition_id),
            ],
        );
        Ok(Some(competition.competition_id))
    }

    /// Weeks still open for entry, with remaining capacity for a plan
    pub fn available_weeks(&self, plan: Plan) -> CompetitionResult<Vec<WeekAvailability>> {
        let now = self.clock.now();
        let docs = self.store.find(
            collections::COMPETITIONS,
            &Filter::new()
                .eq("type", json!("weekly"))
                .is_in("status", vec![json!("upcoming"), json!("active")])
                .gt("end_date", json!(time::format(now))),
            &FindOptions::new().sort(SortSpec::asc("start_date")),
        )?;

        let mut weeks = Vec::with_capacity(docs.len());
        for doc in &docs {
            let comp: Competition = from_document(doc)?;
            let SlotAvailability {
                available,
                remaining,
            } = SlotAllocator::check_availability(&comp, plan);
            weeks.push(WeekAvailability {
                id: comp.id,
                competition_id: comp.competition_id,
                start_date: time::format(comp.start_date),
                end_date: time::format(comp.end_date),
                status: comp.status,
                available,
                remaining,
            });
        }
        Ok(weeks)
    }
}
