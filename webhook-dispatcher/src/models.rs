use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    Submitted,
    Updated,
    Deleted,
    StatusUpdated,
}

impl WebhookEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            WebhookEvent::Submitted => "submitted",
            WebhookEvent::Updated => "updated",
            WebhookEvent::Deleted => "deleted",
            WebhookEvent::StatusUpdated => "status_updated",
        }
    }
}

/// §4.9's wire payload, serialized to form the HMAC-signed body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub form_id: Uuid,
    pub form_title: String,
    pub response_id: Uuid,
    pub data: Value,
}

#[derive(Debug, Clone)]
pub struct DeadLetterEntry {
    pub url: String,
    pub event: WebhookEvent,
    pub response_id: Uuid,
    pub attempts: usize,
    pub last_status: Option<u16>,
    pub last_error: Option<String>,
    pub failed_at: DateTime<Utc>,
}
