//! §8 concrete end-to-end scenarios.

mod common;

use auth_identity::{Credential, IdentityConfig, IdentityService, InMemoryTokenBlocklist, InMemoryUserRepository, Role, UserType};
use chrono::Utc;
use common::*;
use response_store::{InMemoryResponseRepository, ResponseMetadata, ResponseRepository, ResponseStoreService, SubmitRequest};
use schema_engine::{FieldType, FormStatus};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use webhook_dispatcher::{WebhookDispatcher, WebhookEvent};
use workflow_engine::{FormWorkflow, InMemoryWorkflowRepository, WorkflowAction, WorkflowActionOutcome, WorkflowActionType, WorkflowEngine, WorkflowRepository};

fn validator_config() -> platform_config::ValidatorConfig {
    platform_config::ValidatorConfig::default()
}

/// Scenario 1 — Submit + webhook.
#[tokio::test]
async fn scenario_1_submit_plus_webhook() {
    let section_id = Uuid::new_v4();
    let q_name = Uuid::new_v4();
    let version = version(vec![section(section_id, vec![question(q_name, FieldType::Input, true, 0)])]);
    let form = FormBuilder::new(version.clone()).webhook("http://listener", "s", vec!["submitted"]).build();

    let repo = Arc::new(InMemoryResponseRepository::new());
    let service = ResponseStoreService::new(repo);
    let raw = submission(section_id, &[(q_name, json!("Alice"))]);
    let request = SubmitRequest {
        form: &form,
        version: &version,
        submitter: None,
        raw: &raw,
        files: &HashMap::new(),
        is_draft: false,
        is_public_submit: true,
        config: &validator_config(),
        metadata: ResponseMetadata::default(),
    };
    let response = service.submit(request, Utc::now()).await.unwrap();
    assert!(!response.id.is_nil());

    let deliverer = Arc::new(CapturingDeliverer::default());
    let dispatcher = WebhookDispatcher::new(deliverer.clone(), fast_webhook_config());
    dispatcher.dispatch_event(&form, WebhookEvent::Submitted, response.id, response.data.clone());
    tokio::time::sleep(Duration::from_millis(100)).await;

    let calls = deliverer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (url, body, signature) = &calls[0];
    assert_eq!(url, "http://listener");
    assert_eq!(*signature, webhook_dispatcher::sign("s", body));

    let payload: serde_json::Value = serde_json::from_slice(body).unwrap();
    assert_eq!(payload["event"], "submitted");
    assert_eq!(payload["data"][section_id.to_string()][q_name.to_string()], "Alice");
}

/// Scenario 2 — Conditional required.
#[tokio::test]
async fn scenario_2_conditional_required() {
    let section_id = Uuid::new_v4();
    let q_cat = Uuid::new_v4();
    let q_explain = Uuid::new_v4();
    let cat = question(q_cat, FieldType::Input, false, 0);
    let mut explain = question(q_explain, FieldType::Input, false, 1);
    explain.required_condition = Some(format!("answers.get('{q_cat}') == 'other'"));
    let version = version(vec![section(section_id, vec![cat, explain])]);
    let form = FormBuilder::new(version.clone()).build();
    let repo = Arc::new(InMemoryResponseRepository::new());
    let service = ResponseStoreService::new(repo);

    let raw = submission(section_id, &[(q_cat, json!("other"))]);
    let request = SubmitRequest {
        form: &form,
        version: &version,
        submitter: None,
        raw: &raw,
        files: &HashMap::new(),
        is_draft: false,
        is_public_submit: true,
        config: &validator_config(),
        metadata: ResponseMetadata::default(),
    };
    assert!(service.submit(request, Utc::now()).await.is_err());

    let raw = submission(section_id, &[(q_cat, json!("main"))]);
    let request = SubmitRequest {
        form: &form,
        version: &version,
        submitter: None,
        raw: &raw,
        files: &HashMap::new(),
        is_draft: false,
        is_public_submit: true,
        config: &validator_config(),
        metadata: ResponseMetadata::default(),
    };
    assert!(service.submit(request, Utc::now()).await.is_ok());
}

/// Scenario 3 — Workflow redirect, first-match-wins with data mapping.
#[tokio::test]
async fn scenario_3_workflow_redirect_resolves_data_mapping() {
    use schema_engine::{InMemoryFormRepository, FormRepository};

    let form_a_id = Uuid::new_v4();
    let form_b_id = Uuid::new_v4();
    let workflows = Arc::new(InMemoryWorkflowRepository::new());
    let forms = Arc::new(InMemoryFormRepository::new());
    let responses = Arc::new(InMemoryResponseRepository::new());

    let mut data_mapping = BTreeMap::new();
    data_mapping.insert("orig_id".to_string(), "id".to_string());
    data_mapping.insert("orig_priority".to_string(), "priority".to_string());
    let workflow = FormWorkflow {
        id: Uuid::new_v4(),
        name: "escalate".to_string(),
        trigger_form_id: form_a_id,
        trigger_condition: "answers.get('priority') == 'high'".to_string(),
        actions: vec![WorkflowAction {
            action_type: WorkflowActionType::RedirectToForm,
            target_form_id: Some(form_b_id),
            data_mapping,
            assign_to_user_field: None,
        }],
        is_active: true,
        created_at: Utc::now(),
    };
    workflows.upsert(workflow).await;

    let engine = WorkflowEngine::new(workflows, forms.clone(), responses.clone(), noop_notifier());

    let response = response_store::FormResponse {
        id: Uuid::new_v4(),
        form_id: form_a_id,
        version: "1".to_string(),
        submitted_by: None,
        submitted_at: Utc::now(),
        updated_by: None,
        updated_at: None,
        deleted: false,
        deleted_by: None,
        deleted_at: None,
        is_draft: false,
        status: response_store::ApprovalStatus::Pending,
        status_log: Vec::new(),
        data: json!({}),
        metadata: ResponseMetadata::default(),
    };
    let mut flat = HashMap::new();
    flat.insert("priority".to_string(), json!("high"));
    let outcomes = engine.on_submission_success(&response, &flat).await.unwrap();
    assert_eq!(outcomes.len(), 1);
    match &outcomes[0] {
        WorkflowActionOutcome::Redirect { target_form_id, resolved } => {
            assert_eq!(*target_form_id, Some(form_b_id));
            assert_eq!(resolved["orig_priority"], "high");
        }
        other => panic!("expected Redirect, got {other:?}"),
    }

    let mut low_priority = HashMap::new();
    low_priority.insert("priority".to_string(), json!("low"));
    let outcomes = engine.on_submission_success(&response, &low_priority).await.unwrap();
    assert!(outcomes.is_empty());
}

/// Scenario 4 — Lockout then admin unlock.
#[tokio::test]
async fn scenario_4_lockout_then_admin_unlock() {
    struct NoopSms;
    #[async_trait::async_trait]
    impl auth_identity::SmsGateway for NoopSms {
        async fn send_otp(&self, _mobile: &str, _code: &str) -> auth_identity::Result<()> {
            Ok(())
        }
    }

    let users = Arc::new(InMemoryUserRepository::new());
    let svc = IdentityService::new(users.clone(), Arc::new(InMemoryTokenBlocklist::new()), Arc::new(NoopSms), IdentityConfig::default());
    let user = svc
        .register_user(auth_identity::RegisterRequest {
            username: Some("scenario4".to_string()),
            email: None,
            employee_id: None,
            mobile: None,
            password: Some("Str0ng!Pass".to_string()),
            user_type: UserType::Employee,
            roles: vec![Role::User],
        })
        .await
        .unwrap();

    for _ in 0..5 {
        let _ = svc.login("scenario4", Credential::Password("wrong".to_string())).await;
    }

    let err = svc.login("scenario4", Credential::Password("Str0ng!Pass".to_string())).await.unwrap_err();
    let retry_after = match err {
        auth_identity::IdentityError::AccountLocked { retry_after_secs } => retry_after_secs,
        other => panic!("expected AccountLocked, got {other:?}"),
    };
    assert!(retry_after > 23 * 3600 && retry_after <= 24 * 3600);

    let mut unlocked = users.find_by_id(user.id).await.unwrap().unwrap();
    unlocked.lock_until = None;
    unlocked.failed_login_attempts = 0;
    users.update_user(unlocked).await.unwrap();

    let response = svc.login("scenario4", Credential::Password("Str0ng!Pass".to_string())).await.unwrap();
    assert_eq!(response.user.username.as_deref(), Some("scenario4"));
}

/// Scenario 5 — Version pinning across a schema edit.
#[tokio::test]
async fn scenario_5_version_pinning_survives_schema_edit() {
    use schema_engine::{InMemoryFormRepository, NewForm, SchemaService};

    let schema = SchemaService::new(Arc::new(InMemoryFormRepository::new()));
    let creator = Uuid::new_v4();
    let section_id = Uuid::new_v4();
    let q_x = Uuid::new_v4();
    let form = schema
        .create_form(NewForm {
            title: "t".to_string(),
            slug: "scenario5".to_string(),
            created_by: creator,
            is_public: true,
            supported_languages: vec!["en".to_string()],
            default_language: "en".to_string(),
        })
        .await
        .unwrap();
    let sections = vec![section(section_id, vec![question(q_x, FieldType::Input, false, 0)])];
    let form = schema.create_version(form.id, "1.0".to_string(), sections, creator, true).await.unwrap();
    let form = schema.transition_status(form.id, FormStatus::Published).await.unwrap();
    let v1 = form.find_version("1.0").unwrap().clone();

    let repo = Arc::new(InMemoryResponseRepository::new());
    let service = ResponseStoreService::new(repo.clone());
    let raw = submission(section_id, &[(q_x, json!("keep me"))]);
    let request = SubmitRequest {
        form: &form,
        version: &v1,
        submitter: None,
        raw: &raw,
        files: &HashMap::new(),
        is_draft: false,
        is_public_submit: true,
        config: &validator_config(),
        metadata: ResponseMetadata::default(),
    };
    let r1 = service.submit(request, Utc::now()).await.unwrap();

    // "2.0" drops q_x entirely.
    schema.create_version(form.id, "2.0".to_string(), vec![section(Uuid::new_v4(), vec![])], creator, true).await.unwrap();

    let fetched = repo.find_by_id(r1.id).await.unwrap().unwrap();
    assert_eq!(fetched.version, "1.0");
    assert_eq!(fetched.data[section_id.to_string()][q_x.to_string()], "keep me");
}

/// Scenario 6 — Soft-delete reporting consistency.
#[tokio::test]
async fn scenario_6_soft_delete_reporting_consistency() {
    let section_id = Uuid::new_v4();
    let q_id = Uuid::new_v4();
    let version = version(vec![section(section_id, vec![question(q_id, FieldType::Input, false, 0)])]);
    let form = FormBuilder::new(version.clone()).build();
    let repo = Arc::new(InMemoryResponseRepository::new());
    let service = ResponseStoreService::new(repo.clone());

    let mut ids = Vec::new();
    for i in 0..10 {
        let raw = submission(section_id, &[(q_id, json!(format!("v{i}")))]);
        let request = SubmitRequest {
            form: &form,
            version: &version,
            submitter: Some(Uuid::new_v4()),
            raw: &raw,
            files: &HashMap::new(),
            is_draft: false,
            is_public_submit: true,
            config: &validator_config(),
            metadata: ResponseMetadata::default(),
        };
        ids.push(service.submit(request, Utc::now()).await.unwrap().id);
    }
    for id in &ids[0..3] {
        service.soft_delete(*id, Uuid::new_v4(), Utc::now()).await.unwrap();
    }

    let all = repo.list_by_form(form.id).await.unwrap();
    let summary = analytics_engine::summary(&all);
    assert_eq!(summary.total, 7);

    let page = service
        .search(response_store::SearchQuery {
            form_id: form.id,
            filter: None,
            sort_field: "submitted_at".to_string(),
            sort_direction: response_store::SortDirection::Asc,
            cursor: None,
            limit: 100,
            include_drafts: false,
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 7);

    // "include_deleted=true": the repository's unfiltered scan, which an
    // admin-only endpoint would expose directly rather than through `search`.
    assert_eq!(all.len(), 10);
}
