use crate::models::FormWorkflow;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    async fn upsert(&self, workflow: FormWorkflow);
    /// Active workflows for a trigger form, in creation order — §4.8 step 1/3
    /// ("first match wins ... in creation order").
    async fn active_for_form(&self, trigger_form_id: Uuid) -> Vec<FormWorkflow>;
}

#[derive(Default)]
pub struct InMemoryWorkflowRepository {
    workflows: Mutex<HashMap<Uuid, FormWorkflow>>,
}

impl InMemoryWorkflowRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn upsert(&self, workflow: FormWorkflow) {
        self.workflows.lock().await.insert(workflow.id, workflow);
    }

    async fn active_for_form(&self, trigger_form_id: Uuid) -> Vec<FormWorkflow> {
        let mut matches: Vec<FormWorkflow> = self
            .workflows
            .lock()
            .await
            .values()
            .filter(|w| w.is_active && w.trigger_form_id == trigger_form_id)
            .cloned()
            .collect();
        matches.sort_by_key(|w| w.created_at);
        matches
    }
}
