//! Submission intake
//!
//! Creates new submissions and handles in-place resubmission of
//! abandoned drafts. Standard submissions claim a slot immediately;
//! premium submissions stay drafts and claim their slot only when the
//! payment is confirmed.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::errors::{SubmissionError, SubmissionResult};
use super::slug::{is_valid_http_url, normalize_website_url, slugify};
use crate::auth::Actor;
use crate::clock::Clock;
use crate::competitions::{CompetitionError, SlotAllocator};
use crate::config::PlatformConfig;
use crate::events::{emit_best_effort, WebhookEvent, WebhookSink};
use crate::models::{
    from_document, time, to_document, Competition, CompetitionStatus, LinkType, Plan, Pricing,
    Submission, SubmissionStatus, UserProfile,
};
use crate::observability::Logger;
use crate::store::{collections, DocumentStore, Filter, StoreError, Update};
use uuid::Uuid;

/// Raw submission payload
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    /// Week code of the chosen competition, e.g. "2024-W11"
    #[serde(default)]
    pub launch_week: String,
}

/// What the caller gets back from a submit
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub id: String,
    pub slug: String,
    pub status: SubmissionStatus,
}

/// Creates and resubmits submissions
pub struct SubmissionIntake {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    config: PlatformConfig,
    webhooks: Arc<dyn WebhookSink>,
}

impl SubmissionIntake {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        config: PlatformConfig,
        webhooks: Arc<dyn WebhookSink>,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            webhooks,
        }
    }

    /// Create a submission, or update an abandoned draft in place.
    ///
    /// Flow:
    /// 1. Validate fields and URLs
    /// 2. Derive slug and normalized website URL
    /// 3. Duplicate detection (resubmission rule for own drafts)
    /// 4. Resolve the chosen week
    /// 5. Claim a slot (standard only) and insert
    pub fn submit(&self, actor: &Actor, input: SubmitInput) -> SubmissionResult<SubmissionReceipt> {
        let now = self.clock.now();
        let (plan, pricing) = Self::validate(&input)?;

        let slug = slugify(&input.name);
        if slug.is_empty() {
            return Err(SubmissionError::MissingFields(vec!["name".to_string()]));
        }
        let normalized = normalize_website_url(&input.website_url);

        // Duplicate detection against the indexed normalized column
        if let Some(doc) = self.store.find_one(
            collections::APPS,
            &Filter::new().eq("website_url_normalized", json!(normalized)),
        )? {
            let existing: Submission = from_document(&doc)?;
            if existing.submitted_by == actor.id && existing.is_abandoned_draft() {
                return self.resubmit(actor, &existing, &input, plan, pricing, &slug, &normalized, now);
            }
            return Err(SubmissionError::WebsiteExists {
                url: normalized,
                existing_name: existing.name,
            });
        }
        if let Some(doc) = self
            .store
            .find_one(collections::APPS, &Filter::new().eq("slug", json!(slug)))?
        {
            let existing: Submission = from_document(&doc)?;
            if existing.submitted_by == actor.id && existing.is_abandoned_draft() {
                return self.resubmit(actor, &existing, &input, plan, pricing, &slug, &normalized, now);
            }
            return Err(SubmissionError::SlugExists {
                slug,
                existing_name: existing.name,
            });
        }

        let competition = self.find_week(&input.launch_week)?;

        let status = match plan {
            Plan::Standard => {
                // Atomic claim; WEEK_FULL when the ceiling is reached
                SlotAllocator::admit(self.store.as_ref(), &competition, plan)?;
                SubmissionStatus::Pending
            }
            // Premium consumes no slot until payment confirmation
            Plan::Premium => SubmissionStatus::Draft,
        };

        let submission = self.build_submission(
            actor, &input, plan, pricing, &slug, &normalized, &competition, status, now,
        );

        if let Err(e) = self
            .store
            .insert_one(collections::APPS, to_document(&submission)?)
        {
            // Give the claimed slot back before surfacing the conflict
            if plan == Plan::Standard {
                let _ = SlotAllocator::release(self.store.as_ref(), &competition.id, plan);
            }
            return Err(self.map_conflict(e, &slug, &normalized));
        }

        if status != SubmissionStatus::Draft {
            self.bump_user_submissions(&actor.id, now)?;
        }

        emit_best_effort(
            self.webhooks.as_ref(),
            WebhookEvent::ProjectCreated,
            json!({
                "id": submission.id,
                "slug": submission.slug,
                "plan": plan,
                "status": submission.status,
            }),
        );
        Logger::info(
            "SUBMISSION_RECEIVED",
            &[
                ("plan", plan.as_str()),
                ("slug", &submission.slug),
                ("week", &competition.competition_id),
            ],
        );

        Ok(SubmissionReceipt {
            id: submission.id,
            slug: submission.slug,
            status: submission.status,
        })
    }

    /// Confirm a premium draft's payment, claiming its slot.
    ///
    /// Idempotent: confirming an already-paid submission returns it
    /// unchanged, so payment-provider retries are harmless.
    pub fn confirm_payment(
        &self,
        actor: &Actor,
        submission_id: &str,
    ) -> SubmissionResult<Submission> {
        let now = self.clock.now();
        let submission = self.fetch(submission_id)?;

        if submission.submitted_by != actor.id && !actor.role.can_administer() {
            return Err(SubmissionError::Forbidden);
        }
        if submission.plan != Plan::Premium {
            return Err(SubmissionError::InvalidState {
                from: submission.status,
                event: "confirm payment for",
            });
        }
        if submission.payment_status {
            return Ok(submission);
        }
        if submission.status != SubmissionStatus::Draft {
            return Err(SubmissionError::InvalidState {
                from: submission.status,
                event: "confirm payment for",
            });
        }

        let competition_id = submission
            .weekly_competition_id
            .as_deref()
            .ok_or_else(|| CompetitionError::NotFound("<unlinked>".to_string()))?;
        let competition = self.find_by_id(competition_id)?;
        if matches!(
            competition.status,
            CompetitionStatus::Completed | CompetitionStatus::Cancelled
        ) {
            return Err(CompetitionError::WeekClosed(competition.competition_id).into());
        }

        SlotAllocator::admit(self.store.as_ref(), &competition, Plan::Premium)?;

        // An already-open week skips the scheduled stage and queues
        // for review; a future week is scheduled to publish on open
        let (status, approved) = match competition.status {
            CompetitionStatus::Active => (SubmissionStatus::Pending, false),
            _ => (SubmissionStatus::Scheduled, true),
        };

        self.store.update_one(
            collections::APPS,
            &Filter::new().eq("id", json!(submission_id)),
            &Update::new()
                .set("payment_status", json!(true))
                .set("is_draft", json!(false))
                .set("status", json!(status))
                .set("approved", json!(approved))
                .set("entered_weekly", json!(true))
                .set("launch_date", json!(time::format(competition.start_date)))
                .set("updated_at", json!(time::format(now))),
        )?;

        self.bump_user_submissions(&actor.id, now)?;
        Logger::info(
            "PAYMENT_CONFIRMED",
            &[
                ("status", status.as_str()),
                ("submission_id", submission_id),
                ("week", &competition.competition_id),
            ],
        );

        self.fetch(submission_id)
    }

    /// User-initiated deletion; only drafts can be removed
    pub fn delete_draft(&self, actor: &Actor, submission_id: &str) -> SubmissionResult<()> {
        let submission = self.fetch(submission_id)?;
        if submission.submitted_by != actor.id && !actor.role.can_administer() {
            return Err(SubmissionError::Forbidden);
        }
        if submission.status != SubmissionStatus::Draft {
            return Err(SubmissionError::InvalidState {
                from: submission.status,
                event: "delete",
            });
        }
        self.store.delete_one(
            collections::APPS,
            &Filter::new().eq("id", json!(submission_id)),
        )?;
        Ok(())
    }

    fn validate(input: &SubmitInput) -> SubmissionResult<(Plan, Pricing)> {
        let mut missing = Vec::new();
        let mut require = |name: &str, present: bool| {
            if !present {
                missing.push(name.to_string());
            }
        };
        require("name", !input.name.trim().is_empty());
        require("short_description", !input.short_description.trim().is_empty());
        require("website_url", !input.website_url.trim().is_empty());
        require("categories", !input.categories.is_empty());
        require("contact_email", !input.contact_email.trim().is_empty());
        require("plan", input.plan.is_some());
        require("pricing", input.pricing.is_some());
        require("launch_week", !input.launch_week.trim().is_empty());
        if !missing.is_empty() {
            return Err(SubmissionError::MissingFields(missing));
        }

        if input.logo_url.trim().is_empty() {
            return Err(SubmissionError::MissingLogo);
        }
        if input.categories.len() > 3 {
            return Err(SubmissionError::InvalidCategories(input.categories.len()));
        }

        for (field, value) in [
            ("website_url", Some(input.website_url.as_str())),
            ("logo_url", Some(input.logo_url.as_str())),
            ("video_url", input.video_url.as_deref()),
        ] {
            if let Some(value) = value {
                if !value.is_empty() && !is_valid_http_url(value) {
                    return Err(SubmissionError::InvalidUrl {
                        field: field.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        match (input.plan, input.pricing) {
            (Some(plan), Some(pricing)) => Ok((plan, pricing)),
            // Unreachable: presence checked above
            _ => Err(SubmissionError::MissingFields(vec!["plan".to_string()])),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_submission(
        &self,
        actor: &Actor,
        input: &SubmitInput,
        plan: Plan,
        pricing: Pricing,
        slug: &str,
        normalized: &str,
        competition: &Competition,
        status: SubmissionStatus,
        now: DateTime<Utc>,
    ) -> Submission {
        Submission {
            id: Uuid::new_v4().to_string(),
            slug: slug.to_string(),
            name: input.name.trim().to_string(),
            short_description: input.short_description.trim().to_string(),
            website_url: input.website_url.trim().to_string(),
            website_url_normalized: normalized.to_string(),
            logo_url: input.logo_url.trim().to_string(),
            video_url: input.video_url.clone().filter(|v| !v.is_empty()),
            categories: input.categories.clone(),
            pricing,
            plan,
            submitted_by: actor.id.clone(),
            contact_email: input.contact_email.trim().to_string(),
            status,
            is_draft: status == SubmissionStatus::Draft,
            approved: false,
            payment_status: false,
            rejection_reason: None,
            weekly_competition_id: Some(competition.id.clone()),
            entered_weekly: status != SubmissionStatus::Draft,
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
            homepage_end_date: Some(now + Duration::days(self.config.homepage_duration_days)),
            launch_date: Some(competition.start_date),
            published_at: None,
            launched_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update an abandoned draft in place instead of creating a new
    /// row; the id is preserved so payment retries stay attached
    #[allow(clippy::too_many_arguments)]
    fn resubmit(
        &self,
        actor: &Actor,
        existing: &Submission,
        input: &SubmitInput,
        plan: Plan,
        pricing: Pricing,
        slug: &str,
        normalized: &str,
        now: DateTime<Utc>,
    ) -> SubmissionResult<SubmissionReceipt> {
        let competition = self.find_week(&input.launch_week)?;

        let status = match plan {
            Plan::Standard => {
                SlotAllocator::admit(self.store.as_ref(), &competition, plan)?;
                SubmissionStatus::Pending
            }
            Plan::Premium => SubmissionStatus::Draft,
        };

        let mut update = Update::new()
            .set("name", json!(input.name.trim()))
            .set("slug", json!(slug))
            .set("short_description", json!(input.short_description.trim()))
            .set("website_url", json!(input.website_url.trim()))
            .set("website_url_normalized", json!(normalized))
            .set("logo_url", json!(input.logo_url.trim()))
            .set("categories", json!(input.categories))
            .set("pricing", json!(pricing))
            .set("plan", json!(plan))
            .set("contact_email", json!(input.contact_email.trim()))
            .set("status", json!(status))
            .set("is_draft", json!(status == SubmissionStatus::Draft))
            .set("entered_weekly", json!(status != SubmissionStatus::Draft))
            .set("weekly_competition_id", json!(competition.id))
            .set("launch_date", json!(time::format(competition.start_date)))
            .set("homepage_end_date", json!(time::format(
                now + Duration::days(self.config.homepage_duration_days)
            )))
            .set("updated_at", json!(time::format(now)));
        update = match &input.video_url {
            Some(v) if !v.is_empty() => update.set("video_url", json!(v)),
            _ => update.unset("video_url"),
        };

        if let Err(e) = self.store.update_one(
            collections::APPS,
            &Filter::new().eq("id", json!(existing.id)),
            &update,
        ) {
            if plan == Plan::Standard {
                let _ = SlotAllocator::release(self.store.as_ref(), &competition.id, plan);
            }
            return Err(self.map_conflict(e, slug, normalized));
        }

        if status != SubmissionStatus::Draft {
            self.bump_user_submissions(&actor.id, now)?;
        }

        Logger::info(
            "SUBMISSION_RESUBMITTED",
            &[("slug", slug), ("submission_id", &existing.id)],
        );

        Ok(SubmissionReceipt {
            id: existing.id.clone(),
            slug: slug.to_string(),
            status,
        })
    }

    fn fetch(&self, submission_id: &str) -> SubmissionResult<Submission> {
        let doc = self
            .store
            .find_one(
                collections::APPS,
                &Filter::new().eq("id", json!(submission_id)),
            )?
            .ok_or_else(|| SubmissionError::NotFound(submission_id.to_string()))?;
        Ok(from_document(&doc)?)
    }

    fn find_week(&self, code: &str) -> SubmissionResult<Competition> {
        let doc = self
            .store
            .find_one(
                collections::COMPETITIONS,
                &Filter::new()
                    .eq("type", json!("weekly"))
                    .eq("competition_id", json!(code)),
            )?
            .ok_or_else(|| CompetitionError::NotFound(code.to_string()))?;
        let competition: Competition = from_document(&doc)?;
        if matches!(
            competition.status,
            CompetitionStatus::Completed | CompetitionStatus::Cancelled
        ) {
            return Err(CompetitionError::WeekClosed(competition.competition_id).into());
        }
        Ok(competition)
    }

    fn find_by_id(&self, id: &str) -> SubmissionResult<Competition> {
        let doc = self
            .store
            .find_one(
                collections::COMPETITIONS,
                &Filter::new().eq("id", json!(id)),
            )?
            .ok_or_else(|| CompetitionError::NotFound(id.to_string()))?;
        Ok(from_document(&doc)?)
    }

    /// Translate a unique-index conflict into the matching domain error
    fn map_conflict(&self, e: StoreError, slug: &str, normalized: &str) -> SubmissionError {
        let StoreError::UniqueViolation { ref fields, .. } = e else {
            return e.into();
        };
        let existing_name = |filter: Filter| -> String {
            self.store
                .find_one(collections::APPS, &filter)
                .ok()
                .flatten()
                .and_then(|doc| doc.get("name").and_then(|n| n.as_str()).map(String::from))
                .unwrap_or_default()
        };
        if fields.iter().any(|f| f == "slug") {
            SubmissionError::SlugExists {
                slug: slug.to_string(),
                existing_name: existing_name(Filter::new().eq("slug", json!(slug))),
            }
        } else if fields.iter().any(|f| f == "website_url_normalized") {
            SubmissionError::WebsiteExists {
                url: normalized.to_string(),
                existing_name: existing_name(
                    Filter::new().eq("website_url_normalized", json!(normalized)),
                ),
            }
        } else {
            e.into()
        }
    }

    /// Count a non-draft submission on the user's lifetime counter,
    /// creating the profile row on first use
    fn bump_user_submissions(&self, user_id: &str, now: DateTime<Utc>) -> SubmissionResult<()> {
        let outcome = self.store.update_one(
            collections::USERS,
            &Filter::new().eq("id", json!(user_id)),
            &Update::new()
                .inc("total_submissions", 1)
                .set("updated_at", json!(time::format(now))),
        )?;
        if outcome.matched == 0 {
            let mut profile = UserProfile::new(user_id, now);
            profile.total_submissions = 1;
            match self.store.insert_one(collections::USERS, to_document(&profile)?) {
                Ok(()) => {}
                // Lost the creation race; count on the existing row
                Err(StoreError::UniqueViolation { .. }) => {
                    self.store.update_one(
                        collections::USERS,
                        &Filter::new().eq("id", json!(user_id)),
                        &Update::new().inc("total_submissions", 1),
                    )?;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
