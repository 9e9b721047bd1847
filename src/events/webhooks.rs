//! Webhook dispatch
//!
//! The delivering collaborator retries with backoff on its side; the
//! engine does not wait on delivery and never fails an operation
//! because a webhook could not be recorded.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::{EventError, EventResult, WebhookEvent};
use crate::clock::Clock;
use crate::models::{to_document, WebhookLog};
use crate::store::{collections, DocumentStore};

/// Receives outbound webhook events
pub trait WebhookSink: Send + Sync {
    fn emit(&self, event: WebhookEvent, payload: Value) -> EventResult<()>;
}

/// Journals events into the `webhook_logs` collection for the
/// delivering collaborator to pick up
pub struct StoreWebhookSink {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl StoreWebhookSink {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

impl WebhookSink for StoreWebhookSink {
    fn emit(&self, event: WebhookEvent, payload: Value) -> EventResult<()> {
        let log = WebhookLog {
            id: Uuid::new_v4().to_string(),
            event_type: event.as_str().to_string(),
            payload,
            created_at: self.clock.now(),
        };
        let doc = to_document(&log).map_err(|e| EventError::Dispatch(e.to_string()))?;
        self.store
            .insert_one(collections::WEBHOOK_LOGS, doc)
            .map_err(|e| EventError::Dispatch(e.to_string()))
    }
}

/// Discards all events
pub struct NullWebhookSink;

impl WebhookSink for NullWebhookSink {
    fn emit(&self, _event: WebhookEvent, _payload: Value) -> EventResult<()> {
        Ok(())
    }
}
