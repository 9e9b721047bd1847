//! Outbound event interfaces
//!
//! Notification and webhook delivery are external collaborators. The
//! engine only emits; delivery, retry, and templating happen on the
//! other side of these traits. Emission is best-effort everywhere: a
//! failed side effect is logged and never rolls back the state
//! transition that triggered it.

mod notify;
mod webhooks;

pub use notify::{LogNotifier, Notification, NotificationKind, Notifier};
pub use webhooks::{NullWebhookSink, StoreWebhookSink, WebhookSink};

use serde_json::Value;
use thiserror::Error;

use crate::observability::Logger;

/// Result type for event dispatch
pub type EventResult<T> = Result<T, EventError>;

/// Event dispatch errors
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

/// Outbound webhook event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEvent {
    ProjectCreated,
    ProjectApproved,
    ProjectRejected,
    VoteCast,
    CompetitionWinner,
}

impl WebhookEvent {
    /// Wire name of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::ProjectCreated => "project.created",
            WebhookEvent::ProjectApproved => "project.approved",
            WebhookEvent::ProjectRejected => "project.rejected",
            WebhookEvent::VoteCast => "vote.cast",
            WebhookEvent::CompetitionWinner => "competition.winner",
        }
    }
}

/// Emit a webhook, logging instead of propagating on failure
pub fn emit_best_effort(sink: &dyn WebhookSink, event: WebhookEvent, payload: Value) {
    if let Err(e) = sink.emit(event, payload) {
        Logger::warn(
            "WEBHOOK_FAILED",
            &[("error", &e.to_string()), ("event_type", event.as_str())],
        );
    }
}

/// Send a notification, logging instead of propagating on failure
pub fn notify_best_effort(notifier: &dyn Notifier, notification: &Notification) {
    if let Err(e) = notifier.notify(notification) {
        Logger::warn(
            "NOTIFY_FAILED",
            &[
                ("error", &e.to_string()),
                ("kind", notification.kind.as_str()),
                ("user_id", &notification.user_id),
            ],
        );
    }
}
