//! Manual link-type operations
//!
//! Admin-triggered overrides outside the automatic award cycle. Every
//! actual transition writes a journal row attributed to the acting
//! admin; no-op updates (upgrading an already-dofollow submission)
//! write nothing.

use std::sync::Arc;

use serde_json::json;

use super::errors::{AwardError, AwardResult};
use super::journal::LinkTypeJournal;
use crate::auth::Actor;
use crate::clock::Clock;
use crate::models::{from_document, time, LinkType, LinkTypeChange, Submission};
use crate::store::{collections, DocumentStore, Filter, Update};

/// Direction of a bulk link-type update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTypeDirection {
    Upgrade,
    Downgrade,
}

/// One item of a bulk update
#[derive(Debug, Clone)]
pub struct LinkTypeUpdate {
    pub project_id: String,
    pub direction: LinkTypeDirection,
}

/// Per-item failure in a bulk update
#[derive(Debug, Clone)]
pub struct BulkError {
    pub project_id: String,
    pub code: String,
    pub message: String,
}

/// Result of a bulk update; one entry per failed item
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<BulkError>,
}

/// Admin-facing link-type management
pub struct LinkTypeManager {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    journal: LinkTypeJournal,
}

impl LinkTypeManager {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        journal: LinkTypeJournal,
    ) -> Self {
        Self {
            store,
            clock,
            journal,
        }
    }

    fn require_admin(actor: &Actor) -> AwardResult<()> {
        if actor.role.can_administer() {
            Ok(())
        } else {
            Err(AwardError::Forbidden)
        }
    }

    fn fetch(&self, project_id: &str) -> AwardResult<Submission> {
        let doc = self
            .store
            .find_one(collections::APPS, &Filter::new().eq("id", json!(project_id)))?
            .ok_or_else(|| AwardError::NotFound(project_id.to_string()))?;
        Ok(from_document(&doc)?)
    }

    /// Grant dofollow status manually
    pub fn upgrade_to_dofollow(&self, actor: &Actor, project_id: &str) -> AwardResult<Submission> {
        Self::require_admin(actor)?;
        let submission = self.fetch(project_id)?;
        if submission.is_dofollow() {
            return Ok(submission);
        }

        let now = self.clock.now();
        self.store.update_one(
            collections::APPS,
            &Filter::new().eq("id", json!(project_id)),
            &Update::new()
                .set("link_type", json!(LinkType::Dofollow))
                .set("dofollow_status", json!(true))
                .set("dofollow_reason", json!("manual_upgrade"))
                .set("dofollow_awarded_at", json!(time::format(now)))
                .set("updated_at", json!(time::format(now))),
        )?;

        self.journal.append(&LinkTypeChange {
            project_id: project_id.to_string(),
            from_type: LinkType::Nofollow,
            to_type: LinkType::Dofollow,
            changed_by: actor.id.clone(),
            reason: "manual_upgrade".to_string(),
            timestamp: now,
        })?;

        self.fetch(project_id)
    }

    /// Revoke dofollow status manually
    pub fn downgrade_to_nofollow(&self, actor: &Actor, project_id: &str) -> AwardResult<Submission> {
        Self::require_admin(actor)?;
        let submission = self.fetch(project_id)?;
        if !submission.is_dofollow() {
            return Ok(submission);
        }

        let now = self.clock.now();
        self.store.update_one(
            collections::APPS,
            &Filter::new().eq("id", json!(project_id)),
            &Update::new()
                .set("link_type", json!(LinkType::Nofollow))
                .set("dofollow_status", json!(false))
                .unset("dofollow_reason")
                .unset("dofollow_awarded_at")
                .set("updated_at", json!(time::format(now))),
        )?;

        self.journal.append(&LinkTypeChange {
            project_id: project_id.to_string(),
            from_type: LinkType::Dofollow,
            to_type: LinkType::Nofollow,
            changed_by: actor.id.clone(),
            reason: "manual_downgrade".to_string(),
            timestamp: now,
        })?;

        self.fetch(project_id)
    }

    /// Flip the current link type
    pub fn toggle_link_type(&self, actor: &Actor, project_id: &str) -> AwardResult<Submission> {
        Self::require_admin(actor)?;
        let submission = self.fetch(project_id)?;
        if submission.is_dofollow() {
            self.downgrade_to_nofollow(actor, project_id)
        } else {
            self.upgrade_to_dofollow(actor, project_id)
        }
    }

    /// Apply upgrades/downgrades per item; a failing item never aborts
    /// the batch
    pub fn bulk_update_link_types(
        &self,
        actor: &Actor,
        updates: &[LinkTypeUpdate],
    ) -> AwardResult<BulkOutcome> {
        Self::require_admin(actor)?;

        let mut outcome = BulkOutcome::default();
        for item in updates {
            let result = match item.direction {
                LinkTypeDirection::Upgrade => self.upgrade_to_dofollow(actor, &item.project_id),
                LinkTypeDirection::Downgrade => self.downgrade_to_nofollow(actor, &item.project_id),
            };
            match result {
                Ok(_) => outcome.successful += 1,
                Err(e) => {
                    outcome.failed += 1;
                    outcome.errors.push(BulkError {
                        project_id: item.project_id.clone(),
                        code: e.code().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(outcome)
    }

    /// Manually override a competition award result.
    ///
    /// `Some(position)` grants winner status (with dofollow if not
    /// already held); `None` clears it, downgrading only when the
    /// dofollow was held for the weekly win.
    pub fn set_winner_badge(
        &self,
        actor: &Actor,
        project_id: &str,
        position: Option<u8>,
    ) -> AwardResult<Submission> {
        Self::require_admin(actor)?;
        let submission = self.fetch(project_id)?;
        let now = self.clock.now();

        match position {
            Some(position) => {
                if !(1..=3).contains(&position) {
                    return Err(AwardError::InvalidPosition(position));
                }

                let mut update = Update::new()
                    .set("weekly_winner", json!(true))
                    .set("weekly_position", json!(position))
                    .set("updated_at", json!(time::format(now)));
                if !submission.is_dofollow() {
                    update = update
                        .set("link_type", json!(LinkType::Dofollow))
                        .set("dofollow_status", json!(true))
                        .set("dofollow_reason", json!("weekly_winner"))
                        .set("dofollow_awarded_at", json!(time::format(now)));
                }
                self.store.update_one(
                    collections::APPS,
                    &Filter::new().eq("id", json!(project_id)),
                    &update,
                )?;

                if !submission.is_dofollow() {
                    self.journal.append(&LinkTypeChange {
                        project_id: project_id.to_string(),
                        from_type: LinkType::Nofollow,
                        to_type: LinkType::Dofollow,
                        changed_by: actor.id.clone(),
                        reason: format!("weekly_winner_position_{}", position),
                        timestamp: now,
                    })?;
                }
            }
            None => {
                let weekly_dofollow = submission.dofollow_reason
                    == Some(crate::models::DofollowReason::WeeklyWinner);

                let mut update = Update::new()
                    .set("weekly_winner", json!(false))
                    .unset("weekly_position")
                    .set("updated_at", json!(time::format(now)));
                if weekly_dofollow {
                    update = update
                        .set("link_type", json!(LinkType::Nofollow))
                        .set("dofollow_status", json!(false))
                        .unset("dofollow_reason")
                        .unset("dofollow_awarded_at");
                }
                self.store.update_one(
                    collections::APPS,
                    &Filter::new().eq("id", json!(project_id)),
                    &update,
                )?;

                if weekly_dofollow && submission.is_dofollow() {
                    self.journal.append(&LinkTypeChange {
                        project_id: project_id.to_string(),
                        from_type: LinkType::Dofollow,
                        to_type: LinkType::Nofollow,
                        changed_by: actor.id.clone(),
                        reason: "weekly_winner_revoked".to_string(),
                        timestamp: now,
                    })?;
                }
            }
        }

        self.fetch(project_id)
    }
}
