use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Draft,
    Published,
    Archived,
}

impl FormStatus {
    /// §3: `draft↔published→archived→draft`, no direct `draft↔archived→published`.
    pub fn can_transition_to(self, target: FormStatus) -> bool {
        use FormStatus::*;
        matches!(
            (self, target),
            (Draft, Published) | (Published, Draft) | (Published, Archived) | (Archived, Draft)
        ) || self == target
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSubscription {
    pub url: String,
    pub secret: String,
    pub events: Vec<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub created_by: Uuid,
    pub status: FormStatus,
    pub is_public: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub editors: HashSet<String>,
    pub viewers: HashSet<String>,
    pub submitters: HashSet<String>,
    pub supported_languages: Vec<String>,
    pub default_language: String,
    pub webhooks: Vec<WebhookSubscription>,
    pub notification_emails: Vec<String>,
    pub versions: Vec<FormVersion>,
    pub active_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    pub fn active_version(&self) -> Option<&FormVersion> {
        self.versions.iter().find(|v| v.version == self.active_version)
    }

    pub fn find_version(&self, version: &str) -> Option<&FormVersion> {
        self.versions.iter().find(|v| v.version == version)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormVersion {
    pub version: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub sections: Vec<Section>,
    /// language_code -> field_id -> localized text override.
    pub translations: HashMap<String, HashMap<Uuid, String>>,
}

impl FormVersion {
    pub fn localized(&self, lang: &str, field_id: Uuid, base: &str) -> String {
        self.translations
            .get(lang)
            .and_then(|m| m.get(&field_id))
            .cloned()
            .unwrap_or_else(|| base.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionUi {
    Flex,
    GridCols2,
    Tabbed,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub order: u32,
    pub ui: SectionUi,
    pub visibility_condition: Option<String>,
    pub is_disabled: bool,
    pub is_repeatable_section: bool,
    pub repeat_min: u32,
    pub repeat_max: Option<u32>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Input,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Boolean,
    Rating,
    Date,
    FileUpload,
    ApiSearch,
    Calculated,
    Signature,
    Slider,
    Image,
    Divider,
    Spacer,
    MatrixChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldApiCall {
    Uhid,
    EmployeeId,
    Otp,
    Form,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: Uuid,
    pub option_label: String,
    pub option_value: serde_json::Value,
    pub is_default: bool,
    pub is_disabled: bool,
    pub order: u32,
    pub followup_visibility_condition: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationRules(pub BTreeMap<String, serde_json::Value>);

impl ValidationRules {
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(|v| v.as_u64())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(|v| v.as_f64())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub label: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub required_condition: Option<String>,
    pub help_text: Option<String>,
    pub default_value: Option<serde_json::Value>,
    pub order: u32,
    pub visibility_condition: Option<String>,
    pub validation_rules: ValidationRules,
    pub is_repeatable_question: bool,
    pub repeat_min: u32,
    pub repeat_max: Option<u32>,
    pub options: Vec<QuestionOption>,
    pub field_api_call: Option<FieldApiCall>,
    pub custom_script: Option<String>,
    pub meta_data: serde_json::Value,
}
