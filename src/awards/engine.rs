//! Winner award engine
//!
//! Runs once per competition at the moment it closes: ranks the live
//! standard-plan field, grants dofollow + position badges to the top
//! three, journals every transition, and retires the week's entries.

use std::sync::Arc;

use serde_json::json;

use super::errors::AwardResult;
use super::journal::LinkTypeJournal;
use crate::clock::Clock;
use crate::events::{emit_best_effort, WebhookEvent, WebhookSink};
use crate::models::{
    from_document, time, Competition, LinkType, LinkTypeChange, Submission,
};
use crate::observability::Logger;
use crate::store::{collections, DocumentStore, Filter, FindOptions, Update};

/// Outcome of one award pass
#[derive(Debug, Default)]
pub struct AwardSummary {
    /// Submission ids, best first (at most three)
    pub top_three: Vec<String>,

    /// Positions newly granted this pass (0 on re-runs)
    pub awarded: usize,

    pub participants: usize,
    pub total_votes: i64,
}

/// Ranks a closing competition's field and writes the awards back
pub struct AwardEngine {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    journal: LinkTypeJournal,
    webhooks: Arc<dyn WebhookSink>,
}

impl AwardEngine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        journal: LinkTypeJournal,
        webhooks: Arc<dyn WebhookSink>,
    ) -> Self {
        Self {
            store,
            clock,
            journal,
            webhooks,
        }
    }

    /// Award dofollow + position badges for a closed competition.
    ///
    /// Safe to re-run: a candidate already holding a position is
    /// skipped via a conditional write, so positions are granted at
    /// most once and journal rows are never duplicated.
    pub fn award_winners(&self, competition: &Competition) -> AwardResult<AwardSummary> {
        let now = self.clock.now();

        // Only live standard-plan entries compete for dofollow
        let docs = self.store.find(
            collections::APPS,
            &Filter::new()
                .eq("weekly_competition_id", json!(competition.id))
                .eq("plan", json!("standard"))
                .eq("status", json!("live")),
            &FindOptions::new(),
        )?;
        let mut candidates: Vec<Submission> = docs
            .iter()
            .map(from_document)
            .collect::<Result<_, _>>()?;

        // Most upvotes first; earlier submission wins a tie
        candidates.sort_by(|a, b| {
            b.upvotes
                .cmp(&a.upvotes)
                .then(a.created_at.cmp(&b.created_at))
        });

        let mut summary = AwardSummary {
            participants: candidates.len(),
            total_votes: candidates.iter().map(|c| c.upvotes).sum(),
            ..Default::default()
        };

        for (index, winner) in candidates.iter().take(3).enumerate() {
            let position = (index + 1) as u8;
            summary.top_three.push(winner.id.clone());

            // Conditional on the position being unset: exactly one
            // award per submission even under concurrent re-runs
            let outcome = self.store.update_one(
                collections::APPS,
                &Filter::new()
                    .eq("id", json!(winner.id))
                    .exists("weekly_position", false),
                &Update::new()
                    .set("link_type", json!(LinkType::Dofollow))
                    .set("dofollow_status", json!(true))
                    .set("dofollow_reason", json!("weekly_winner"))
                    .set("dofollow_awarded_at", json!(time::format(now)))
                    .set("weekly_winner", json!(true))
                    .set("weekly_position", json!(position))
                    .set("updated_at", json!(time::format(now))),
            )?;

            if outcome.matched == 0 {
                continue;
            }
            summary.awarded += 1;

            self.journal.append(&LinkTypeChange {
                project_id: winner.id.clone(),
                from_type: winner.link_type,
                to_type: LinkType::Dofollow,
                changed_by: "system".to_string(),
                reason: format!("weekly_winner_position_{}", position),
                timestamp: now,
            })?;
        }

        self.write_results(competition, &summary, now)?;
        self.retire_entries(competition)?;

        if summary.awarded > 0 {
            emit_best_effort(
                self.webhooks.as_ref(),
                WebhookEvent::CompetitionWinner,
                json!({
                    "competition_id": competition.competition_id,
                    "winner_id": summary.top_three.first(),
                    "top_three_ids": summary.top_three,
                }),
            );
        }

        Logger::info(
            "WINNERS_AWARDED",
            &[
                ("awarded", &summary.awarded.to_string()),
                ("participants", &summary.participants.to_string()),
                ("week", &competition.competition_id),
            ],
        );

        Ok(summary)
    }

    fn write_results(
        &self,
        competition: &Competition,
        summary: &AwardSummary,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AwardResult<()> {
        let runner_up_ids: Vec<&String> = summary.top_three.iter().skip(1).collect();
        let mut update = Update::new()
            .set("runner_up_ids", json!(runner_up_ids))
            .set("top_three_ids", json!(summary.top_three))
            .set("total_votes", json!(summary.total_votes))
            .set("total_participants", json!(summary.participants as i64))
            .set("updated_at", json!(time::format(now)));
        if let Some(winner_id) = summary.top_three.first() {
            update = update.set("winner_id", json!(winner_id));
        }

        self.store.update_one(
            collections::COMPETITIONS,
            &Filter::new().eq("id", json!(competition.id)),
            &update,
        )?;
        Ok(())
    }

    /// Remove all of the week's entries from "current weekly" views,
    /// winners and losers alike
    fn retire_entries(&self, competition: &Competition) -> AwardResult<()> {
        self.store.update_many(
            collections::APPS,
            &Filter::new()
                .eq("weekly_competition_id", json!(competition.id))
                .eq("entered_weekly", json!(true)),
            &Update::new()
                .set("entered_weekly", json!(false))
                .set("weekly_competition_ended", json!(true)),
        )?;
        Ok(())
    }
}
