//! Voting ledger
//!
//! One vote per user per submission, restricted to currently-open
//! competition windows. Uniqueness rides the store's compound index
//! on (user_id, app_id): a concurrent double-vote loses at insert and
//! surfaces as ALREADY_VOTED, never as a silent success.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use super::errors::{VoteError, VoteResult};
use crate::auth::Actor;
use crate::clock::Clock;
use crate::events::{emit_best_effort, WebhookEvent, WebhookSink};
use crate::models::{
    from_document, time, to_document, Competition, Submission, SubmissionStatus, UserProfile,
    Vote, VoteType,
};
use crate::observability::Logger;
use crate::store::{collections, DocumentStore, Filter, StoreError, Update};

/// Vote action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Upvote,
    Remove,
}

/// Request metadata recorded with the vote
#[derive(Debug, Clone, Default)]
pub struct VoteMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Records votes and keeps the three counters in step
pub struct VotingLedger {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    webhooks: Arc<dyn WebhookSink>,
}

impl VotingLedger {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        webhooks: Arc<dyn WebhookSink>,
    ) -> Self {
        Self {
            store,
            clock,
            webhooks,
        }
    }

    /// Cast or remove a vote for a submission
    pub fn cast_vote(
        &self,
        actor: &Actor,
        app_id: &str,
        action: VoteAction,
        meta: VoteMeta,
    ) -> VoteResult<()> {
        match action {
            VoteAction::Upvote => self.upvote(actor, app_id, meta),
            VoteAction::Remove => self.remove(actor, app_id),
        }
    }

    fn upvote(&self, actor: &Actor, app_id: &str, meta: VoteMeta) -> VoteResult<()> {
        let now = self.clock.now();
        let submission = self.fetch_submission(app_id)?;

        if submission.status != SubmissionStatus::Live {
            return Err(VoteError::NotLive);
        }
        let competition_id = submission
            .weekly_competition_id
            .as_deref()
            .ok_or(VoteError::NoCompetition)?;
        let competition = self.fetch_competition(competition_id)?;
        if !competition.window_contains(now) {
            return Err(VoteError::VotingClosed(competition.competition_id));
        }

        let vote = Vote {
            id: Uuid::new_v4().to_string(),
            user_id: actor.id.clone(),
            app_id: app_id.to_string(),
            weekly_competition_id: competition.id.clone(),
            vote_type: VoteType::Upvote,
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
            created_at: now,
        };
        match self.store.insert_one(collections::VOTES, to_document(&vote)?) {
            Ok(()) => {}
            Err(StoreError::UniqueViolation { .. }) => return Err(VoteError::AlreadyVoted),
            Err(e) => return Err(e.into()),
        }

        self.adjust_counters(app_id, &actor.id, &competition.id, 1, now)?;

        emit_best_effort(
            self.webhooks.as_ref(),
            WebhookEvent::VoteCast,
            json!({
                "app_id": app_id,
                "user_id": actor.id,
                "week": competition.competition_id,
            }),
        );
        Logger::info(
            "VOTE_CAST",
            &[("app_id", app_id), ("user_id", &actor.id)],
        );
        Ok(())
    }

    fn remove(&self, actor: &Actor, app_id: &str) -> VoteResult<()> {
        let now = self.clock.now();
        let submission = self.fetch_submission(app_id)?;

        let deleted = self.store.delete_one(
            collections::VOTES,
            &Filter::new()
                .eq("user_id", json!(actor.id))
                .eq("app_id", json!(app_id)),
        )?;
        if !deleted {
            return Err(VoteError::NoVote);
        }

        let competition_id = submission
            .weekly_competition_id
            .as_deref()
            .ok_or(VoteError::NoCompetition)?;
        self.adjust_counters(app_id, &actor.id, competition_id, -1, now)?;

        Logger::info(
            "VOTE_REMOVED",
            &[("app_id", app_id), ("user_id", &actor.id)],
        );
        Ok(())
    }

    /// Atomically move the submission, user, and competition counters
    /// together
    fn adjust_counters(
        &self,
        app_id: &str,
        user_id: &str,
        competition_id: &str,
        delta: i64,
        now: DateTime<Utc>,
    ) -> VoteResult<()> {
        self.store.update_one(
            collections::APPS,
            &Filter::new().eq("id", json!(app_id)),
            &Update::new()
                .inc("upvotes", delta)
                .inc("total_engagement", delta)
                .set("updated_at", json!(time::format(now))),
        )?;

        let outcome = self.store.update_one(
            collections::USERS,
            &Filter::new().eq("id", json!(user_id)),
            &Update::new()
                .inc("total_votes", delta)
                .set("updated_at", json!(time::format(now))),
        )?;
        if outcome.matched == 0 {
            let mut profile = UserProfile::new(user_id, now);
            profile.total_votes = delta.max(0);
            match self.store.insert_one(collections::USERS, to_document(&profile)?) {
                Ok(()) => {}
                // Lost the creation race; count on the existing row
                Err(StoreError::UniqueViolation { .. }) => {
                    self.store.update_one(
                        collections::USERS,
                        &Filter::new().eq("id", json!(user_id)),
                        &Update::new().inc("total_votes", delta),
                    )?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.store.update_one(
            collections::COMPETITIONS,
            &Filter::new().eq("id", json!(competition_id)),
            &Update::new().inc("total_votes", delta),
        )?;
        Ok(())
    }

    fn fetch_submission(&self, app_id: &str) -> VoteResult<Submission> {
        let doc = self
            .store
            .find_one(collections::APPS, &Filter::new().eq("id", json!(app_id)))?
            .ok_or_else(|| VoteError::SubmissionNotFound(app_id.to_string()))?;
        Ok(from_document(&doc)?)
    }

    fn fetch_competition(&self, id: &str) -> VoteResult<Competition> {
        let doc = self
            .store
            .find_one(
                collections::COMPETITIONS,
                &Filter::new().eq("id", json!(id)),
            )?
            .ok_or_else(|| VoteError::CompetitionNotFound(id.to_string()))?;
        Ok(from_document(&doc)?)
    }
}
