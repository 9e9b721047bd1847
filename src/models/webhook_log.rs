//! Webhook dispatch record (`webhook_logs` collection)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::time;

/// A journaled outbound webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookLog {
    pub id: String,
    pub event_type: String,
    pub payload: Value,
    #[serde(with = "time::rfc3339")]
    pub created_at: DateTime<Utc>,
}
