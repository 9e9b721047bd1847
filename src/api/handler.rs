//! API handler
//!
//! Dispatches parsed requests to the platform services and shapes the
//! results into response envelopes.

use std::sync::Arc;

use serde_json::{json, Value};

use super::errors::{ApiError, ApiResult};
use super::request::{LinkTypeOp, Request};
use super::response::Response;
use crate::platform::Platform;

/// Request dispatcher over the assembled platform
pub struct ApiHandler {
    platform: Arc<Platform>,
}

impl ApiHandler {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    /// Handle a raw JSON request string
    pub fn handle(&self, json_request: &str) -> Response {
        let request = match Request::parse(json_request) {
            Ok(r) => r,
            Err(e) => return Response::error(&e),
        };

        match self.dispatch(request) {
            Ok(data) => Response::success(data),
            Err(e) => Response::error(&e),
        }
    }

    fn dispatch(&self, request: Request) -> ApiResult<Value> {
        match request {
            Request::Submit { actor, input } => {
                let receipt = self.platform.intake.submit(&actor, input)?;
                to_value(&receipt)
            }
            Request::ConfirmPayment {
                actor,
                submission_id,
            } => {
                let submission = self.platform.intake.confirm_payment(&actor, &submission_id)?;
                Ok(json!({
                    "id": submission.id,
                    "status": submission.status,
                    "payment_status": submission.payment_status,
                }))
            }
            Request::Vote {
                actor,
                app_id,
                action,
                meta,
            } => {
                self.platform.voting.cast_vote(&actor, &app_id, action, meta)?;
                Ok(Value::Null)
            }
            Request::Approve {
                actor,
                project_id,
                action,
                rejection_reason,
            } => {
                let submission = self.platform.reviewer.review(
                    &actor,
                    &project_id,
                    action,
                    rejection_reason.as_deref(),
                )?;
                Ok(json!({
                    "id": submission.id,
                    "status": submission.status,
                    "approved": submission.approved,
                    "rejection_reason": submission.rejection_reason,
                }))
            }
            Request::WinnerBadge {
                actor,
                project_id,
                position,
            } => {
                let submission =
                    self.platform
                        .link_types
                        .set_winner_badge(&actor, &project_id, position)?;
                Ok(json!({
                    "id": submission.id,
                    "weekly_winner": submission.weekly_winner,
                    "weekly_position": submission.weekly_position,
                    "link_type": submission.link_type,
                }))
            }
            Request::LinkType { actor, op } => match op {
                LinkTypeOp::Upgrade(project_id) => {
                    let s = self.platform.link_types.upgrade_to_dofollow(&actor, &project_id)?;
                    Ok(link_type_summary(&s))
                }
                LinkTypeOp::Downgrade(project_id) => {
                    let s = self
                        .platform
                        .link_types
                        .downgrade_to_nofollow(&actor, &project_id)?;
                    Ok(link_type_summary(&s))
                }
                LinkTypeOp::Toggle(project_id) => {
                    let s = self.platform.link_types.toggle_link_type(&actor, &project_id)?;
                    Ok(link_type_summary(&s))
                }
                LinkTypeOp::Bulk(updates) => {
                    let outcome = self
                        .platform
                        .link_types
                        .bulk_update_link_types(&actor, &updates)?;
                    Ok(json!({
                        "successful": outcome.successful,
                        "failed": outcome.failed,
                        "errors": outcome
                            .errors
                            .iter()
                            .map(|e| json!({
                                "project_id": e.project_id,
                                "code": e.code,
                                "message": e.message,
                            }))
                            .collect::<Vec<_>>(),
                    }))
                }
            },
            Request::Competitions { plan } => {
                let weeks = self.platform.lifecycle.available_weeks(plan)?;
                to_value(&weeks)
            }
        }
    }
}

fn link_type_summary(submission: &crate::models::Submission) -> Value {
    json!({
        "id": submission.id,
        "link_type": submission.link_type,
        "dofollow_status": submission.dofollow_status,
        "dofollow_reason": submission.dofollow_reason,
    })
}

fn to_value<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::invalid_request(e.to_string()))
}
