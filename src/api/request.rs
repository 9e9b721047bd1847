//! API request types
//!
//! JSON envelope parsing for all supported operations. The actor
//! context arrives already verified by the upstream auth layer; this
//! module only shapes it.

use serde::Deserialize;

use super::errors::{ApiError, ApiResult};
use crate::auth::{Actor, Role};
use crate::awards::{LinkTypeDirection, LinkTypeUpdate};
use crate::models::Plan;
use crate::submissions::{ReviewAction, SubmitInput};
use crate::voting::{VoteAction, VoteMeta};

/// Unified request envelope
#[derive(Debug)]
pub enum Request {
    Submit {
        actor: Actor,
        input: SubmitInput,
    },
    ConfirmPayment {
        actor: Actor,
        submission_id: String,
    },
    Vote {
        actor: Actor,
        app_id: String,
        action: VoteAction,
        meta: VoteMeta,
    },
    Approve {
        actor: Actor,
        project_id: String,
        action: ReviewAction,
        rejection_reason: Option<String>,
    },
    WinnerBadge {
        actor: Actor,
        project_id: String,
        position: Option<u8>,
    },
    LinkType {
        actor: Actor,
        op: LinkTypeOp,
    },
    Competitions {
        plan: Plan,
    },
}

/// Manual link-type operation variants
#[derive(Debug)]
pub enum LinkTypeOp {
    Upgrade(String),
    Downgrade(String),
    Toggle(String),
    Bulk(Vec<LinkTypeUpdate>),
}

/// Raw request for parsing
#[derive(Debug, Deserialize)]
struct RawRequest {
    op: String,
    #[serde(default)]
    actor_id: Option<String>,
    #[serde(default)]
    actor_role: Option<Role>,
    #[serde(default)]
    submission: Option<SubmitInput>,
    #[serde(default)]
    submission_id: Option<String>,
    #[serde(default)]
    app_id: Option<String>,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    rejection_reason: Option<String>,
    #[serde(default)]
    weekly_position: Option<u8>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    updates: Option<Vec<RawLinkTypeItem>>,
    #[serde(default)]
    plan: Option<Plan>,
    #[serde(default)]
    ip_address: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLinkTypeItem {
    project_id: String,
    direction: String,
}

impl Request {
    /// Parse a request from a JSON string
    pub fn parse(json: &str) -> ApiResult<Self> {
        let raw: RawRequest = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;

        match raw.op.as_str() {
            "submit" => {
                let actor = Self::actor(&raw)?;
                let input = raw
                    .submission
                    .ok_or_else(|| ApiError::invalid_request("Missing submission"))?;
                Ok(Request::Submit { actor, input })
            }
            "confirm_payment" => {
                let actor = Self::actor(&raw)?;
                let submission_id = raw
                    .submission_id
                    .ok_or_else(|| ApiError::invalid_request("Missing submission_id"))?;
                Ok(Request::ConfirmPayment {
                    actor,
                    submission_id,
                })
            }
            "vote" => {
                let actor = Self::actor(&raw)?;
                let app_id = raw
                    .app_id
                    .ok_or_else(|| ApiError::invalid_request("Missing app_id"))?;
                let action = match raw.action.as_deref() {
                    Some("upvote") | None => VoteAction::Upvote,
                    Some("remove") => VoteAction::Remove,
                    Some(other) => {
                        return Err(ApiError::invalid_request(format!(
                            "Unknown vote action: {}",
                            other
                        )))
                    }
                };
                Ok(Request::Vote {
                    actor,
                    app_id,
                    action,
                    meta: VoteMeta {
                        ip_address: raw.ip_address,
                        user_agent: raw.user_agent,
                    },
                })
            }
            "approve" => {
                let actor = Self::actor(&raw)?;
                let project_id = raw
                    .project_id
                    .ok_or_else(|| ApiError::invalid_request("Missing project_id"))?;
                let action = match raw.action.as_deref() {
                    Some("approve") => ReviewAction::Approve,
                    Some("reject") => ReviewAction::Reject,
                    other => {
                        return Err(ApiError::invalid_request(format!(
                            "Action must be approve or reject, got {:?}",
                            other
                        )))
                    }
                };
                Ok(Request::Approve {
                    actor,
                    project_id,
                    action,
                    rejection_reason: raw.rejection_reason,
                })
            }
            "winner_badge" => {
                let actor = Self::actor(&raw)?;
                let project_id = raw
                    .project_id
                    .ok_or_else(|| ApiError::invalid_request("Missing project_id"))?;
                Ok(Request::WinnerBadge {
                    actor,
                    project_id,
                    position: raw.weekly_position,
                })
            }
            "link_type" => {
                let actor = Self::actor(&raw)?;
                let op = match raw.direction.as_deref() {
                    Some("bulk") => {
                        let items = raw
                            .updates
                            .ok_or_else(|| ApiError::invalid_request("Missing updates"))?
                            .into_iter()
                            .map(|item| {
                                let direction = match item.direction.as_str() {
                                    "upgrade" => LinkTypeDirection::Upgrade,
                                    "downgrade" => LinkTypeDirection::Downgrade,
                                    other => {
                                        return Err(ApiError::invalid_request(format!(
                                            "Unknown link type direction: {}",
                                            other
                                        )))
                                    }
                                };
                                Ok(LinkTypeUpdate {
                                    project_id: item.project_id,
                                    direction,
                                })
                            })
                            .collect::<ApiResult<Vec<_>>>()?;
                        LinkTypeOp::Bulk(items)
                    }
                    Some(direction) => {
                        let project_id = raw
                            .project_id
                            .ok_or_else(|| ApiError::invalid_request("Missing project_id"))?;
                        match direction {
                            "upgrade" => LinkTypeOp::Upgrade(project_id),
                            "downgrade" => LinkTypeOp::Downgrade(project_id),
                            "toggle" => LinkTypeOp::Toggle(project_id),
                            other => {
                                return Err(ApiError::invalid_request(format!(
                                    "Unknown link type direction: {}",
                                    other
                                )))
                            }
                        }
                    }
                    None => return Err(ApiError::invalid_request("Missing direction")),
                };
                Ok(Request::LinkType { actor, op })
            }
            "competitions" => Ok(Request::Competitions {
                plan: raw.plan.unwrap_or(Plan::Standard),
            }),
            other => Err(ApiError::unknown_operation(other)),
        }
    }

    fn actor(raw: &RawRequest) -> ApiResult<Actor> {
        let id = raw
            .actor_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(ApiError::unauthorized)?;
        Ok(Actor {
            id: id.to_string(),
            role: raw.actor_role.unwrap_or(Role::User),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_actor_is_unauthorized() {
        let err = Request::parse(r#"{"op": "vote", "app_id": "a1"}"#).unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_unknown_operation() {
        let err = Request::parse(r#"{"op": "frobnicate"}"#).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_OPERATION");
    }

    #[test]
    fn test_vote_defaults_to_upvote() {
        let request =
            Request::parse(r#"{"op": "vote", "actor_id": "u1", "app_id": "a1"}"#).unwrap();
        match request {
            Request::Vote { action, actor, .. } => {
                assert_eq!(action, VoteAction::Upvote);
                assert_eq!(actor.role, Role::User);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_competitions_is_public() {
        let request = Request::parse(r#"{"op": "competitions", "plan": "premium"}"#).unwrap();
        match request {
            Request::Competitions { plan } => assert_eq!(plan, Plan::Premium),
            other => panic!("unexpected request: {:?}", other),
        }
    }
}
