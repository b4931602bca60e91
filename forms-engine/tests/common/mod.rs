#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use notifier::EmailGateway;
use schema_engine::{
    FieldType, Form, FormStatus, FormVersion, Question, QuestionOption, Section, SectionUi,
    ValidationRules, WebhookSubscription,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use webhook_dispatcher::HttpDeliverer;
use workflow_engine::WorkflowNotifier;

pub fn question(id: Uuid, field_type: FieldType, required: bool, order: u32) -> Question {
    Question {
        id,
        label: "q".to_string(),
        field_type,
        is_required: required,
        required_condition: None,
        help_text: None,
        default_value: None,
        order,
        visibility_condition: None,
        validation_rules: ValidationRules::default(),
        is_repeatable_question: false,
        repeat_min: 0,
        repeat_max: None,
        options: Vec::new(),
        field_api_call: None,
        custom_script: None,
        meta_data: serde_json::json!({}),
    }
}

pub fn checkbox_question(id: Uuid, option_values: &[&str]) -> Question {
    let mut q = question(id, FieldType::Checkbox, false, 0);
    q.options = option_values
        .iter()
        .enumerate()
        .map(|(i, v)| QuestionOption {
            id: Uuid::new_v4(),
            option_label: v.to_string(),
            option_value: serde_json::json!(v),
            is_default: false,
            is_disabled: false,
            order: i as u32,
            followup_visibility_condition: None,
        })
        .collect();
    q
}

pub fn section(id: Uuid, questions: Vec<Question>) -> Section {
    Section {
        id,
        title: "s".to_string(),
        description: None,
        order: 0,
        ui: SectionUi::Flex,
        visibility_condition: None,
        is_disabled: false,
        is_repeatable_section: false,
        repeat_min: 0,
        repeat_max: None,
        questions,
    }
}

pub fn version(sections: Vec<Section>) -> FormVersion {
    FormVersion {
        version: "1".to_string(),
        created_by: Uuid::new_v4(),
        created_at: Utc::now(),
        sections,
        translations: HashMap::new(),
    }
}

pub struct FormBuilder {
    form: Form,
}

impl FormBuilder {
    pub fn new(version: FormVersion) -> Self {
        let now = Utc::now();
        Self {
            form: Form {
                id: Uuid::new_v4(),
                title: "form".to_string(),
                slug: format!("form-{}", Uuid::new_v4()),
                created_by: Uuid::new_v4(),
                status: FormStatus::Published,
                is_public: true,
                expires_at: None,
                editors: HashSet::new(),
                viewers: HashSet::new(),
                submitters: HashSet::new(),
                supported_languages: vec!["en".to_string()],
                default_language: "en".to_string(),
                webhooks: Vec::new(),
                notification_emails: Vec::new(),
                versions: vec![version],
                active_version: "1".to_string(),
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn status(mut self, status: FormStatus) -> Self {
        self.form.status = status;
        self
    }

    pub fn is_public(mut self, is_public: bool) -> Self {
        self.form.is_public = is_public;
        self
    }

    pub fn expires_at(mut self, at: chrono::DateTime<Utc>) -> Self {
        self.form.expires_at = Some(at);
        self
    }

    pub fn webhook(mut self, url: &str, secret: &str, events: Vec<&str>) -> Self {
        self.form.webhooks.push(WebhookSubscription {
            url: url.to_string(),
            secret: secret.to_string(),
            events: events.into_iter().map(String::from).collect(),
            active: true,
        });
        self
    }

    pub fn notification_email(mut self, email: &str) -> Self {
        self.form.notification_emails.push(email.to_string());
        self
    }

    pub fn build(self) -> Form {
        self.form
    }
}

pub fn submission(section_id: Uuid, fields: &[(Uuid, Value)]) -> Value {
    let mut instance = serde_json::Map::new();
    for (id, value) in fields {
        instance.insert(id.to_string(), value.clone());
    }
    let mut root = serde_json::Map::new();
    root.insert(section_id.to_string(), Value::Object(instance));
    Value::Object(root)
}

/// Captures every delivery attempt so tests can assert on the signed body
/// without a live network call, same role as webhook-dispatcher's own
/// `AlwaysFails`/`AlwaysSucceeds` test deliverers.
#[derive(Default)]
pub struct CapturingDeliverer {
    pub calls: Mutex<Vec<(String, Vec<u8>, String)>>,
}

#[async_trait]
impl HttpDeliverer for CapturingDeliverer {
    async fn post(&self, url: &str, body: Vec<u8>, signature: &str, _timeout: Duration) -> webhook_dispatcher::Result<u16> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push((url.to_string(), body, signature.to_string()));
        Ok(200)
    }
}

/// Records every outbound email instead of sending one, same shape as
/// `notifier`'s own `RecordingGateway` test double.
#[derive(Default)]
pub struct CapturingGateway {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl EmailGateway for CapturingGateway {
    async fn send(&self, to: &str, subject: &str, html: &str) -> notifier::Result<()> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).push((to.to_string(), subject.to_string(), html.to_string()));
        Ok(())
    }
}

/// Counts calls without caring about the payload, for workflow `notify_user`
/// assertions.
#[derive(Default)]
pub struct CountingWorkflowNotifier {
    pub count: AtomicUsize,
}

#[async_trait]
impl WorkflowNotifier for CountingWorkflowNotifier {
    async fn notify(&self, _user_id: Uuid, _workflow_name: &str, _resolved: &Value) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn fast_webhook_config() -> platform_config::WebhookConfig {
    platform_config::WebhookConfig {
        retry_schedule: vec![Duration::from_millis(0)],
        request_timeout_secs: 5,
        worker_pool_size: 4,
    }
}

pub fn noop_notifier() -> Arc<CountingWorkflowNotifier> {
    Arc::new(CountingWorkflowNotifier::default())
}
