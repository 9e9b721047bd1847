//! Platform assembly
//!
//! Wires the store, clock, and services together and installs the
//! unique indexes the engine's invariants depend on.

use std::sync::Arc;

use crate::awards::{AwardEngine, LinkTypeJournal, LinkTypeManager};
use crate::clock::Clock;
use crate::competitions::LifecycleManager;
use crate::config::PlatformConfig;
use crate::events::{LogNotifier, Notifier, StoreWebhookSink, WebhookSink};
use crate::store::{collections, DocumentStore, StoreResult};
use crate::submissions::{SubmissionIntake, SubmissionReviewer};
use crate::voting::VotingLedger;

/// The assembled engine
pub struct Platform {
    pub store: Arc<dyn DocumentStore>,
    pub clock: Arc<dyn Clock>,
    pub config: PlatformConfig,
    pub lifecycle: LifecycleManager,
    pub intake: SubmissionIntake,
    pub reviewer: SubmissionReviewer,
    pub voting: VotingLedger,
    pub link_types: LinkTypeManager,
    pub journal: LinkTypeJournal,
}

impl Platform {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        config: PlatformConfig,
    ) -> StoreResult<Self> {
        Self::install_indexes(store.as_ref())?;

        let webhooks: Arc<dyn WebhookSink> =
            Arc::new(StoreWebhookSink::new(store.clone(), clock.clone()));
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        let journal = LinkTypeJournal::new(store.clone());

        let awards = AwardEngine::new(
            store.clone(),
            clock.clone(),
            journal.clone(),
            webhooks.clone(),
        );
        let lifecycle = LifecycleManager::new(store.clone(), clock.clone(), config.clone(), awards);
        let intake = SubmissionIntake::new(
            store.clone(),
            clock.clone(),
            config.clone(),
            webhooks.clone(),
        );
        let reviewer = SubmissionReviewer::new(
            store.clone(),
            clock.clone(),
            config.clone(),
            journal.clone(),
            notifier,
            webhooks.clone(),
        );
        let voting = VotingLedger::new(store.clone(), clock.clone(), webhooks);
        let link_types = LinkTypeManager::new(store.clone(), clock.clone(), journal.clone());

        Ok(Self {
            store,
            clock,
            config,
            lifecycle,
            intake,
            reviewer,
            voting,
            link_types,
            journal,
        })
    }

    /// The compound index on votes is the one-vote-per-user-per-app
    /// invariant; the apps indexes back duplicate detection
    fn install_indexes(store: &dyn DocumentStore) -> StoreResult<()> {
        store.ensure_unique_index(collections::APPS, &["id"])?;
        store.ensure_unique_index(collections::APPS, &["slug"])?;
        store.ensure_unique_index(collections::APPS, &["website_url_normalized"])?;
        store.ensure_unique_index(collections::COMPETITIONS, &["id"])?;
        store.ensure_unique_index(collections::COMPETITIONS, &["type", "competition_id"])?;
        store.ensure_unique_index(collections::VOTES, &["user_id", "app_id"])?;
        store.ensure_unique_index(collections::USERS, &["id"])?;
        Ok(())
    }
}
