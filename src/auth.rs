//! Actor identity and role guards
//!
//! Authentication itself happens at an external provider; requests
//! arrive with an already-verified actor context. This module only
//! decides what a given role may do.

use serde::{Deserialize, Serialize};

/// Authority level of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular signed-in user
    User,
    /// Platform administrator
    Admin,
    /// Internal automation (scheduler, award engine)
    System,
}

impl Role {
    /// Whether the role may perform admin operations
    pub fn can_administer(&self) -> bool {
        matches!(self, Role::Admin | Role::System)
    }
}

/// A verified request principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Admin,
        }
    }

    /// The internal automation principal
    pub fn system() -> Self {
        Self {
            id: "system".to_string(),
            role: Role::System,
        }
    }
}
