use crate::error::*;
use crate::models::Form;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn create(&self, form: Form) -> Result<Form>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Form>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Form>>;
    async fn update(&self, form: Form) -> Result<Form>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn list(&self) -> Result<Vec<Form>>;
}

#[derive(Default)]
pub struct InMemoryFormRepository {
    forms: Mutex<HashMap<Uuid, Form>>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn create(&self, form: Form) -> Result<Form> {
        let mut forms = self.forms.lock().await;
        if forms.values().any(|f| f.slug == form.slug) {
            return Err(SchemaError::DuplicateSlug(form.slug.clone()));
        }
        forms.insert(form.id, form.clone());
        Ok(form)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Form>> {
        Ok(self.forms.lock().await.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Form>> {
        Ok(self.forms.lock().await.values().find(|f| f.slug == slug).cloned())
    }

    async fn update(&self, form: Form) -> Result<Form> {
        let mut forms = self.forms.lock().await;
        if !forms.contains_key(&form.id) {
            return Err(SchemaError::FormNotFound);
        }
        forms.insert(form.id, form.clone());
        Ok(form)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.forms.lock().await.remove(&id).ok_or(SchemaError::FormNotFound)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Form>> {
        Ok(self.forms.lock().await.values().cloned().collect())
    }
}
