use crate::error::Result;
use crate::mapping::resolve_data_mapping;
use crate::models::{FormWorkflow, WorkflowAction, WorkflowActionType};
use crate::repository::WorkflowRepository;
use async_trait::async_trait;
use chrono::Utc;
use expr_eval::{eval_bool, vars_from_json, Vars};
use response_store::{ApprovalStatus, ChangeType, FormResponse, ResponseHistory, ResponseMetadata, ResponseRepository};
use schema_engine::FormRepository;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Injected the same way `auth-identity::SmsGateway` is: `notifier`/
/// `forms-engine` own the concrete email delivery, this crate only needs
/// to know "send this resolved payload to this user".
#[async_trait]
pub trait WorkflowNotifier: Send + Sync {
    async fn notify(&self, user_id: Uuid, workflow_name: &str, resolved: &Value);
}

#[derive(Debug, Clone)]
pub enum WorkflowActionOutcome {
    /// No server side-effect; the caller surfaces this as `workflow_action`
    /// in the submit response for the client to follow.
    Redirect { target_form_id: Option<Uuid>, resolved: Value },
    DraftCreated { response_id: Uuid },
    Notified { user_id: Option<Uuid> },
    Skipped { reason: String },
}

pub struct WorkflowEngine<W: WorkflowRepository, F: FormRepository, RS: ResponseRepository> {
    workflows: Arc<W>,
    forms: Arc<F>,
    responses: Arc<RS>,
    notifier: Arc<dyn WorkflowNotifier>,
}

impl<W, F, RS> WorkflowEngine<W, F, RS>
where
    W: WorkflowRepository,
    F: FormRepository,
    RS: ResponseRepository,
{
    pub fn new(workflows: Arc<W>, forms: Arc<F>, responses: Arc<RS>, notifier: Arc<dyn WorkflowNotifier>) -> Self {
        Self { workflows, forms, responses, notifier }
    }

    /// §4.8: on submission success, loads active workflows for the
    /// triggering form, evaluates `trigger_condition` in creation order, and
    /// runs the first match's actions. A parse or runtime failure in a
    /// condition is treated as non-match and logged, never propagated.
    pub async fn on_submission_success(
        &self,
        response: &FormResponse,
        flat_answers: &HashMap<String, Value>,
    ) -> Result<Vec<WorkflowActionOutcome>> {
        let candidates = self.workflows.active_for_form(response.form_id).await;
        let json_flat: serde_json::Map<String, Value> = flat_answers.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let vars: Vars = vars_from_json(&json_flat);

        for workflow in candidates {
            let expr = match expr_eval::parse(&workflow.trigger_condition) {
                Ok(expr) => expr,
                Err(err) => {
                    tracing::warn!(workflow_id = %workflow.id, %err, "trigger_condition failed to parse, skipping workflow");
                    continue;
                }
            };
            if !eval_bool(&expr, &vars) {
                continue;
            }

            let mut outcomes = Vec::with_capacity(workflow.actions.len());
            for action in &workflow.actions {
                outcomes.push(self.execute_action(&workflow, action, response, flat_answers).await?);
            }
            return Ok(outcomes);
        }
        Ok(Vec::new())
    }

    async fn execute_action(
        &self,
        workflow: &FormWorkflow,
        action: &WorkflowAction,
        response: &FormResponse,
        flat_answers: &HashMap<String, Value>,
    ) -> Result<WorkflowActionOutcome> {
        let resolved = resolve_data_mapping(&action.data_mapping, response, flat_answers);
        match action.action_type {
            WorkflowActionType::RedirectToForm => {
                Ok(WorkflowActionOutcome::Redirect { target_form_id: action.target_form_id, resolved })
            }
            WorkflowActionType::CreateDraft => self.create_draft(workflow, action, flat_answers, resolved).await,
            WorkflowActionType::NotifyUser => self.notify_user(workflow, action, flat_answers, resolved).await,
        }
    }

    async fn create_draft(
        &self,
        workflow: &FormWorkflow,
        action: &WorkflowAction,
        flat_answers: &HashMap<String, Value>,
        resolved: Value,
    ) -> Result<WorkflowActionOutcome> {
        let Some(target_form_id) = action.target_form_id else {
            return Ok(WorkflowActionOutcome::Skipped { reason: "create_draft action has no target_form_id".to_string() });
        };
        let Some(target_form) = self.forms.find_by_id(target_form_id).await? else {
            return Ok(WorkflowActionOutcome::Skipped { reason: "target form not found".to_string() });
        };

        let submitted_by = action
            .assign_to_user_field
            .as_ref()
            .and_then(|field| flat_answers.get(field))
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok());

        let now = Utc::now();
        let draft = FormResponse {
            id: Uuid::new_v4(),
            form_id: target_form.id,
            version: target_form.active_version.clone(),
            submitted_by,
            submitted_at: now,
            updated_by: None,
            updated_at: None,
            deleted: false,
            deleted_by: None,
            deleted_at: None,
            is_draft: true,
            status: ApprovalStatus::Pending,
            status_log: Vec::new(),
            data: resolved,
            metadata: ResponseMetadata { source: None, ip: None, user_agent: None, source_workflow_id: Some(workflow.id) },
        };
        let inserted = self.responses.insert(draft).await?;
        self.responses
            .append_history(ResponseHistory {
                id: Uuid::new_v4(),
                response_id: inserted.id,
                form_id: inserted.form_id,
                version: 1,
                data_before: None,
                data_after: Some(inserted.data.clone()),
                changed_by: None,
                changed_at: now,
                change_type: ChangeType::Create,
            })
            .await?;
        Ok(WorkflowActionOutcome::DraftCreated { response_id: inserted.id })
    }

    async fn notify_user(
        &self,
        workflow: &FormWorkflow,
        action: &WorkflowAction,
        flat_answers: &HashMap<String, Value>,
        resolved: Value,
    ) -> Result<WorkflowActionOutcome> {
        let user_id = action
            .assign_to_user_field
            .as_ref()
            .and_then(|field| flat_answers.get(field))
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok());
        if let Some(user_id) = user_id {
            self.notifier.notify(user_id, &workflow.name, &resolved).await;
        } else {
            tracing::warn!(workflow_id = %workflow.id, "notify_user action could not resolve a user id");
        }
        Ok(WorkflowActionOutcome::Notified { user_id })
    }
}
