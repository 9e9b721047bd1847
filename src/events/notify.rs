//! Submitter notifications
//!
//! Email/in-app rendering and delivery live with the external
//! collaborator; the engine hands over a structured notification.

use super::EventResult;
use crate::observability::Logger;

/// Notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    SubmissionApproved,
    SubmissionRejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::SubmissionApproved => "submission_approved",
            NotificationKind::SubmissionRejected => "submission_rejected",
        }
    }
}

/// A notification addressed to a submitter
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub user_id: String,
    pub user_email: String,
    pub submission_id: String,
    pub submission_name: String,
    /// Present for rejections
    pub reason: Option<String>,
}

/// Delivers notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> EventResult<()>;
}

/// Writes notifications to the structured log only
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> EventResult<()> {
        Logger::info(
            "NOTIFICATION_SENT",
            &[
                ("kind", notification.kind.as_str()),
                ("submission_id", &notification.submission_id),
                ("user_id", &notification.user_id),
            ],
        );
        Ok(())
    }
}
