use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowActionType {
    RedirectToForm,
    CreateDraft,
    NotifyUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowAction {
    pub action_type: WorkflowActionType,
    pub target_form_id: Option<Uuid>,
    /// `target_field_id -> source_key`, resolved per §4.8's data-mapping rules.
    pub data_mapping: BTreeMap<String, String>,
    pub assign_to_user_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormWorkflow {
    pub id: Uuid,
    pub name: String,
    pub trigger_form_id: Uuid,
    pub trigger_condition: String,
    pub actions: Vec<WorkflowAction>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl FormWorkflow {
    pub fn default_trigger_condition() -> String {
        "True".to_string()
    }
}
