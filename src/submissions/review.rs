//! Submission review
//!
//! Admin approval and rejection of pending submissions. Approval
//! routes to `scheduled` or `live` depending on the linked
//! competition's status; premium approval also grants dofollow.

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;

use super::errors::{SubmissionError, SubmissionResult};
use crate::auth::Actor;
use crate::awards::LinkTypeJournal;
use crate::clock::Clock;
use crate::config::PlatformConfig;
use crate::events::{
    emit_best_effort, notify_best_effort, Notification, NotificationKind, Notifier, WebhookEvent,
    WebhookSink,
};
use crate::models::{
    from_document, time, Competition, CompetitionStatus, LinkType, LinkTypeChange, Plan,
    Submission, SubmissionStatus,
};
use crate::observability::Logger;
use crate::store::{collections, DocumentStore, Filter, Update};

/// Review verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// Applies admin review decisions
pub struct SubmissionReviewer {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    config: PlatformConfig,
    journal: LinkTypeJournal,
    notifier: Arc<dyn Notifier>,
    webhooks: Arc<dyn WebhookSink>,
}

impl SubmissionReviewer {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        config: PlatformConfig,
        journal: LinkTypeJournal,
        notifier: Arc<dyn Notifier>,
        webhooks: Arc<dyn WebhookSink>,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            journal,
            notifier,
            webhooks,
        }
    }

    /// Approve or reject a pending submission.
    ///
    /// Only pending submissions can be reviewed; rejection is
    /// absorbing and requires a non-empty reason.
    pub fn review(
        &self,
        actor: &Actor,
        project_id: &str,
        action: ReviewAction,
        rejection_reason: Option<&str>,
    ) -> SubmissionResult<Submission> {
        if !actor.role.can_administer() {
            return Err(SubmissionError::Forbidden);
        }

        let submission = self.fetch(project_id)?;
        if submission.status != SubmissionStatus::Pending {
            return Err(SubmissionError::InvalidState {
                from: submission.status,
                event: "review",
            });
        }

        match action {
            ReviewAction::Reject => self.reject(actor, &submission, rejection_reason),
            ReviewAction::Approve => self.approve(actor, &submission),
        }
    }

    fn reject(
        &self,
        _actor: &Actor,
        submission: &Submission,
        reason: Option<&str>,
    ) -> SubmissionResult<Submission> {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(SubmissionError::MissingReason)?;
        let now = self.clock.now();

        self.store.update_one(
            collections::APPS,
            &Filter::new().eq("id", json!(submission.id)),
            &Update::new()
                .set("status", json!(SubmissionStatus::Rejected))
                .set("approved", json!(false))
                .set("rejection_reason", json!(reason))
                .set("updated_at", json!(time::format(now))),
        )?;

        let updated = self.fetch(&submission.id)?;
        self.dispatch_outcome(&updated, NotificationKind::SubmissionRejected, Some(reason));
        Logger::info(
            "SUBMISSION_REJECTED",
            &[("submission_id", &submission.id)],
        );
        Ok(updated)
    }

    fn approve(&self, actor: &Actor, submission: &Submission) -> SubmissionResult<Submission> {
        let now = self.clock.now();
        let competition = self.linked_competition(submission)?;

        // A future week holds the submission as scheduled; an open (or
        // missing) week publishes it immediately
        let goes_live = !matches!(
            competition.as_ref().map(|c| c.status),
            Some(CompetitionStatus::Upcoming)
        );

        let mut update = Update::new()
            .set("approved", json!(true))
            .set("updated_at", json!(time::format(now)));
        if goes_live {
            update = update
                .set("status", json!(SubmissionStatus::Live))
                .set("published_at", json!(time::format(now)))
                .set("launched_at", json!(time::format(now)))
                .set("homepage_start_date", json!(time::format(now)))
                .set("homepage_end_date", json!(time::format(
                    now + Duration::days(self.config.homepage_duration_days)
                )));
        } else {
            update = update.set("status", json!(SubmissionStatus::Scheduled));
        }

        // Premium earns dofollow on approval, independent of the
        // competition outcome
        let grants_dofollow = submission.plan == Plan::Premium && !submission.is_dofollow();
        if grants_dofollow {
            update = update
                .set("link_type", json!(LinkType::Dofollow))
                .set("dofollow_status", json!(true))
                .set("dofollow_reason", json!("premium_plan"))
                .set("dofollow_awarded_at", json!(time::format(now)));
        }

        self.store.update_one(
            collections::APPS,
            &Filter::new().eq("id", json!(submission.id)),
            &update,
        )?;

        if grants_dofollow {
            self.journal.append(&LinkTypeChange {
                project_id: submission.id.clone(),
                from_type: submission.link_type,
                to_type: LinkType::Dofollow,
                changed_by: actor.id.clone(),
                reason: "premium_plan".to_string(),
                timestamp: now,
            })?;
        }

        let updated = self.fetch(&submission.id)?;
        self.dispatch_outcome(&updated, NotificationKind::SubmissionApproved, None);
        Logger::info(
            "SUBMISSION_APPROVED",
            &[
                ("status", updated.status.as_str()),
                ("submission_id", &submission.id),
            ],
        );
        Ok(updated)
    }

    /// Retire a live submission from the directory
    pub fn archive(&self, actor: &Actor, project_id: &str) -> SubmissionResult<Submission> {
        if !actor.role.can_administer() {
            return Err(SubmissionError::Forbidden);
        }
        let submission = self.fetch(project_id)?;
        if submission.status != SubmissionStatus::Live {
            return Err(SubmissionError::InvalidState {
                from: submission.status,
                event: "archive",
            });
        }
        let now = self.clock.now();
        self.store.update_one(
            collections::APPS,
            &Filter::new().eq("id", json!(project_id)),
            &Update::new()
                .set("status", json!(SubmissionStatus::Archived))
                .set("updated_at", json!(time::format(now))),
        )?;
        self.fetch(project_id)
    }

    /// Notification and webhook are secondary effects: failures are
    /// logged inside the helpers and never fail the review
    fn dispatch_outcome(
        &self,
        submission: &Submission,
        kind: NotificationKind,
        reason: Option<&str>,
    ) {
        notify_best_effort(
            self.notifier.as_ref(),
            &Notification {
                kind,
                user_id: submission.submitted_by.clone(),
                user_email: submission.contact_email.clone(),
                submission_id: submission.id.clone(),
                submission_name: submission.name.clone(),
                reason: reason.map(String::from),
            },
        );

        let event = match kind {
            NotificationKind::SubmissionApproved => WebhookEvent::ProjectApproved,
            NotificationKind::SubmissionRejected => WebhookEvent::ProjectRejected,
        };
        emit_best_effort(
            self.webhooks.as_ref(),
            event,
            json!({
                "id": submission.id,
                "slug": submission.slug,
                "status": submission.status,
                "reason": reason,
            }),
        );
    }

    fn fetch(&self, project_id: &str) -> SubmissionResult<Submission> {
        let doc = self
            .store
            .find_one(
                collections::APPS,
                &Filter::new().eq("id", json!(project_id)),
            )?
            .ok_or_else(|| SubmissionError::NotFound(project_id.to_string()))?;
        Ok(from_document(&doc)?)
    }

    fn linked_competition(
        &self,
        submission: &Submission,
    ) -> SubmissionResult<Option<Competition>> {
        let Some(id) = submission.weekly_competition_id.as_deref() else {
            return Ok(None);
        };
        let doc = self
            .store
            .find_one(collections::COMPETITIONS, &Filter::new().eq("id", json!(id)))?;
        match doc {
            Some(doc) => Ok(Some(from_document(&doc)?)),
            None => Ok(None),
        }
    }
}
