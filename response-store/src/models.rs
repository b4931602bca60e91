use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// §4.7: `pending<->approved`, `pending<->rejected`, no direct
    /// `approved<->rejected`.
    pub fn can_transition_to(self, target: ApprovalStatus) -> bool {
        use ApprovalStatus::*;
        matches!(
            (self, target),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Pending) | (Rejected, Pending)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusLogEntry {
    pub from: ApprovalStatus,
    pub to: ApprovalStatus,
    pub actor: Uuid,
    pub at: DateTime<Utc>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub source: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// §4.8: set when a `create_draft` workflow action spawned this
    /// response, naming the workflow that created it.
    pub source_workflow_id: Option<Uuid>,
}

impl Default for ResponseMetadata {
    fn default() -> Self {
        Self { source: None, ip: None, user_agent: None, source_workflow_id: None }
    }
}

/// §3 `FormResponse`. `submitted_by` is `None` for anonymous submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub id: Uuid,
    pub form_id: Uuid,
    pub version: String,
    pub submitted_by: Option<Uuid>,
    pub submitted_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_draft: bool,
    pub status: ApprovalStatus,
    pub status_log: Vec<StatusLogEntry>,
    pub data: Value,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
    Restore,
    StatusChange,
}

/// §3 `ResponseHistory`. `version` here is the history entry's own
/// revision counter, distinct from `FormResponse::version` (the pinned
/// schema version).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseHistory {
    pub id: Uuid,
    pub response_id: Uuid,
    pub form_id: Uuid,
    pub version: u32,
    pub data_before: Option<Value>,
    pub data_after: Option<Value>,
    pub changed_by: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
    pub change_type: ChangeType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseComment {
    pub id: Uuid,
    pub response_id: Uuid,
    pub author: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: Uuid,
    pub owner: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub filter: FilterNode,
    pub sort_field: String,
    pub created_at: DateTime<Utc>,
}

/// §4.5's filter tree: `{leaf | $and | $or | $not}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FilterNode {
    Leaf { field_id: String, op: FilterOp, value: Value },
    DateRange { from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>> },
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Icontains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub form_id: Uuid,
    pub filter: Option<FilterNode>,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub cursor: Option<Cursor>,
    pub limit: usize,
    pub include_drafts: bool,
}

/// Opaque pagination cursor: `(sort_key_value, last_id)`, base64-encoded
/// for the caller so the encoding stays an implementation detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub sort_key: Value,
    pub last_id: Uuid,
}

impl Cursor {
    /// The opaque string handed to API callers: base64 of the JSON-encoded
    /// cursor, so the server can change its internal shape without
    /// breaking clients that just echo it back on the next page.
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("Cursor always serializes");
        base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, json)
    }

    pub fn decode(s: &str) -> crate::error::Result<Self> {
        let bytes = base64::Engine::decode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, s)
            .map_err(|_| crate::error::ResponseStoreError::BadCursor)?;
        serde_json::from_slice(&bytes).map_err(|_| crate::error::ResponseStoreError::BadCursor)
    }
}

#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<FormResponse>,
    pub next_cursor: Option<Cursor>,
}
