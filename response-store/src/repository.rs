use crate::error::*;
use crate::models::*;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn insert(&self, response: FormResponse) -> Result<FormResponse>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FormResponse>>;
    async fn update(&self, response: FormResponse) -> Result<FormResponse>;
    /// Unfiltered scan over one form's responses, including soft-deleted and
    /// draft rows. Filtering for list/search semantics happens in the service
    /// layer so it stays storage-agnostic.
    async fn list_by_form(&self, form_id: Uuid) -> Result<Vec<FormResponse>>;
    async fn append_history(&self, entry: ResponseHistory) -> Result<()>;
    async fn history_for(&self, response_id: Uuid) -> Result<Vec<ResponseHistory>>;
    async fn add_comment(&self, comment: ResponseComment) -> Result<()>;
    async fn comments_for(&self, response_id: Uuid) -> Result<Vec<ResponseComment>>;
    async fn save_search(&self, search: SavedSearch) -> Result<()>;
    async fn saved_searches_for(&self, owner: Uuid, form_id: Uuid) -> Result<Vec<SavedSearch>>;
}

#[derive(Default)]
pub struct InMemoryResponseRepository {
    responses: Mutex<HashMap<Uuid, FormResponse>>,
    history: Mutex<Vec<ResponseHistory>>,
    comments: Mutex<Vec<ResponseComment>>,
    saved_searches: Mutex<Vec<SavedSearch>>,
}

impl InMemoryResponseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseRepository for InMemoryResponseRepository {
    async fn insert(&self, response: FormResponse) -> Result<FormResponse> {
        self.responses.lock().await.insert(response.id, response.clone());
        Ok(response)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FormResponse>> {
        Ok(self.responses.lock().await.get(&id).cloned())
    }

    async fn update(&self, response: FormResponse) -> Result<FormResponse> {
        let mut responses = self.responses.lock().await;
        if !responses.contains_key(&response.id) {
            return Err(ResponseStoreError::NotFound(response.id));
        }
        responses.insert(response.id, response.clone());
        Ok(response)
    }

    async fn list_by_form(&self, form_id: Uuid) -> Result<Vec<FormResponse>> {
        Ok(self
            .responses
            .lock()
            .await
            .values()
            .filter(|r| r.form_id == form_id)
            .cloned()
            .collect())
    }

    async fn append_history(&self, entry: ResponseHistory) -> Result<()> {
        self.history.lock().await.push(entry);
        Ok(())
    }

    async fn history_for(&self, response_id: Uuid) -> Result<Vec<ResponseHistory>> {
        Ok(self
            .history
            .lock()
            .await
            .iter()
            .filter(|h| h.response_id == response_id)
            .cloned()
            .collect())
    }

    async fn add_comment(&self, comment: ResponseComment) -> Result<()> {
        self.comments.lock().await.push(comment);
        Ok(())
    }

    async fn comments_for(&self, response_id: Uuid) -> Result<Vec<ResponseComment>> {
        Ok(self
            .comments
            .lock()
            .await
            .iter()
            .filter(|c| c.response_id == response_id)
            .cloned()
            .collect())
    }

    async fn save_search(&self, search: SavedSearch) -> Result<()> {
        self.saved_searches.lock().await.push(search);
        Ok(())
    }

    async fn saved_searches_for(&self, owner: Uuid, form_id: Uuid) -> Result<Vec<SavedSearch>> {
        Ok(self
            .saved_searches
            .lock()
            .await
            .iter()
            .filter(|s| s.owner == owner && s.form_id == form_id)
            .cloned()
            .collect())
    }
}
