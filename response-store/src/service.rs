use crate::error::*;
use crate::filter;
use crate::models::*;
use crate::repository::ResponseRepository;
use chrono::{DateTime, Utc};
use form_validator::{check_submission_gates, validate_submission, FileUpload, ValidationRequest};
use platform_config::ValidatorConfig;
use schema_engine::{Form, FormVersion};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct ResponseStoreService<R: ResponseRepository> {
    repo: Arc<R>,
}

pub struct SubmitRequest<'a> {
    pub form: &'a Form,
    pub version: &'a FormVersion,
    pub submitter: Option<Uuid>,
    pub raw: &'a Value,
    pub files: &'a HashMap<Uuid, FileUpload>,
    pub is_draft: bool,
    pub is_public_submit: bool,
    pub config: &'a ValidatorConfig,
    pub metadata: ResponseMetadata,
}

impl<R: ResponseRepository> ResponseStoreService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// §4.5 `Submit`. Gates and field validation are delegated to
    /// `form-validator`; submitter-permission (§4.6) is the caller's
    /// responsibility, same split `form-validator` itself documents.
    pub async fn submit(&self, request: SubmitRequest<'_>, now: DateTime<Utc>) -> Result<FormResponse> {
        check_submission_gates(request.form, request.is_public_submit, now)?;
        let validation = ValidationRequest {
            version: request.version,
            raw: request.raw,
            files: request.files,
            is_draft: request.is_draft,
            config: request.config,
        };
        let data = validate_submission(&validation)?;

        let response = FormResponse {
            id: Uuid::new_v4(),
            form_id: request.form.id,
            version: request.version.version.clone(),
            submitted_by: request.submitter,
            submitted_at: now,
            updated_by: None,
            updated_at: None,
            deleted: false,
            deleted_by: None,
            deleted_at: None,
            is_draft: request.is_draft,
            status: ApprovalStatus::Pending,
            status_log: Vec::new(),
            data,
            metadata: request.metadata,
        };
        let response = self.repo.insert(response).await?;
        self.repo
            .append_history(ResponseHistory {
                id: Uuid::new_v4(),
                response_id: response.id,
                form_id: response.form_id,
                version: 1,
                data_before: None,
                data_after: Some(response.data.clone()),
                changed_by: response.submitted_by,
                changed_at: now,
                change_type: ChangeType::Create,
            })
            .await?;
        Ok(response)
    }

    /// §4.5 `Update`: only the original submitter, revalidated against the
    /// pinned version. Anonymous responses (`submitted_by == None`) have no
    /// identity to match and so can never be updated this way.
    pub async fn update(
        &self,
        response_id: Uuid,
        updater: Uuid,
        version: &FormVersion,
        raw: &Value,
        files: &HashMap<Uuid, FileUpload>,
        config: &ValidatorConfig,
        now: DateTime<Utc>,
    ) -> Result<FormResponse> {
        let mut response = self.repo.find_by_id(response_id).await?.ok_or(ResponseStoreError::NotFound(response_id))?;
        if response.submitted_by != Some(updater) {
            return Err(ResponseStoreError::NotSubmitter);
        }
        if response.deleted {
            return Err(ResponseStoreError::AlreadyDeleted(response_id));
        }

        let validation = ValidationRequest {
            version,
            raw,
            files,
            is_draft: response.is_draft,
            config,
        };
        let new_data = validate_submission(&validation)?;

        let before = response.data.clone();
        response.data = new_data.clone();
        response.updated_by = Some(updater);
        response.updated_at = Some(now);
        let response = self.repo.update(response).await?;

        let revision = self.repo.history_for(response_id).await?.len() as u32 + 1;
        self.repo
            .append_history(ResponseHistory {
                id: Uuid::new_v4(),
                response_id: response.id,
                form_id: response.form_id,
                version: revision,
                data_before: Some(before),
                data_after: Some(new_data),
                changed_by: Some(updater),
                changed_at: now,
                change_type: ChangeType::Update,
            })
            .await?;
        Ok(response)
    }

    pub async fn soft_delete(&self, response_id: Uuid, deleted_by: Uuid, now: DateTime<Utc>) -> Result<FormResponse> {
        let mut response = self.repo.find_by_id(response_id).await?.ok_or(ResponseStoreError::NotFound(response_id))?;
        if response.deleted {
            return Err(ResponseStoreError::AlreadyDeleted(response_id));
        }
        response.deleted = true;
        response.deleted_by = Some(deleted_by);
        response.deleted_at = Some(now);
        let data = response.data.clone();
        let response = self.repo.update(response).await?;

        let revision = self.repo.history_for(response_id).await?.len() as u32 + 1;
        self.repo
            .append_history(ResponseHistory {
                id: Uuid::new_v4(),
                response_id,
                form_id: response.form_id,
                version: revision,
                data_before: Some(data),
                data_after: None,
                changed_by: Some(deleted_by),
                changed_at: now,
                change_type: ChangeType::Delete,
            })
            .await?;
        Ok(response)
    }

    pub async fn restore(&self, response_id: Uuid, restored_by: Uuid, now: DateTime<Utc>) -> Result<FormResponse> {
        let mut response = self.repo.find_by_id(response_id).await?.ok_or(ResponseStoreError::NotFound(response_id))?;
        if !response.deleted {
            return Err(ResponseStoreError::NotDeleted(response_id));
        }
        response.deleted = false;
        response.deleted_by = None;
        response.deleted_at = None;
        let data = response.data.clone();
        let response = self.repo.update(response).await?;

        let revision = self.repo.history_for(response_id).await?.len() as u32 + 1;
        self.repo
            .append_history(ResponseHistory {
                id: Uuid::new_v4(),
                response_id,
                form_id: response.form_id,
                version: revision,
                data_before: None,
                data_after: Some(data),
                changed_by: Some(restored_by),
                changed_at: now,
                change_type: ChangeType::Restore,
            })
            .await?;
        Ok(response)
    }

    /// §4.7 approval state machine. Emitting the `status_updated` webhook
    /// and submitter email is the caller's job (`webhook-dispatcher` /
    /// `notifier`), not this crate's — same boundary choice as everywhere
    /// else permission/delivery concerns touch persistence.
    pub async fn transition_status(
        &self,
        response_id: Uuid,
        actor: Uuid,
        target: ApprovalStatus,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<FormResponse> {
        let mut response = self.repo.find_by_id(response_id).await?.ok_or(ResponseStoreError::NotFound(response_id))?;
        if !response.status.can_transition_to(target) {
            return Err(ResponseStoreError::InvalidTransition(format!("{:?} -> {:?}", response.status, target)));
        }
        let from = response.status;
        response.status_log.push(StatusLogEntry { from, to: target, actor, at: now, comment });
        response.status = target;
        let response = self.repo.update(response).await?;

        let revision = self.repo.history_for(response_id).await?.len() as u32 + 1;
        self.repo
            .append_history(ResponseHistory {
                id: Uuid::new_v4(),
                response_id,
                form_id: response.form_id,
                version: revision,
                data_before: Some(serde_json::json!({ "status": from })),
                data_after: Some(serde_json::json!({ "status": target })),
                changed_by: Some(actor),
                changed_at: now,
                change_type: ChangeType::StatusChange,
            })
            .await?;
        Ok(response)
    }

    /// §4.5 `Search`: cursor pagination, stable `(sort_field, id)` order,
    /// soft-delete and draft exclusion by default.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchPage> {
        let mut candidates: Vec<FormResponse> = self
            .repo
            .list_by_form(query.form_id)
            .await?
            .into_iter()
            .filter(|r| !r.deleted)
            .filter(|r| query.include_drafts || !r.is_draft)
            .filter(|r| match &query.filter {
                Some(node) => filter::matches(node, &filter::flatten(&r.data), r.submitted_at),
                None => true,
            })
            .collect();

        candidates.sort_by(|a, b| {
            let ord = cmp_sort_key(a, b, &query.sort_field);
            let ord = match query.sort_direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            ord.then_with(|| a.id.cmp(&b.id))
        });

        if let Some(cursor) = &query.cursor {
            let start = candidates
                .iter()
                .position(|r| r.id == cursor.last_id)
                .map(|idx| idx + 1)
                .unwrap_or(0);
            candidates = candidates.split_off(start.min(candidates.len()));
        }

        let has_more = candidates.len() > query.limit;
        candidates.truncate(query.limit);
        let next_cursor = if has_more {
            candidates.last().map(|r| Cursor { sort_key: sort_key_value(r, &query.sort_field), last_id: r.id })
        } else {
            None
        };

        Ok(SearchPage { items: candidates, next_cursor })
    }

    pub async fn paginated_list(
        &self,
        form_id: Uuid,
        offset: usize,
        limit: usize,
        include_drafts: bool,
    ) -> Result<Vec<FormResponse>> {
        let mut all: Vec<FormResponse> = self
            .repo
            .list_by_form(form_id)
            .await?
            .into_iter()
            .filter(|r| !r.deleted)
            .filter(|r| include_drafts || !r.is_draft)
            .collect();
        all.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    pub async fn count(&self, form_id: Uuid, include_drafts: bool) -> Result<usize> {
        Ok(self
            .repo
            .list_by_form(form_id)
            .await?
            .into_iter()
            .filter(|r| !r.deleted)
            .filter(|r| include_drafts || !r.is_draft)
            .count())
    }

    /// §4.5 `Duplicate check`: compares a caller-chosen field subset against
    /// existing non-deleted responses from the same form and submitter.
    pub async fn duplicate_check(
        &self,
        form_id: Uuid,
        submitter: Option<Uuid>,
        fields_subset: &HashMap<String, Value>,
    ) -> Result<bool> {
        let existing = self.repo.list_by_form(form_id).await?;
        Ok(existing.iter().any(|r| {
            !r.deleted
                && r.submitted_by == submitter
                && fields_subset.iter().all(|(k, v)| filter::flatten(&r.data).get(k) == Some(v))
        }))
    }
}

fn sort_key_value(response: &FormResponse, field: &str) -> Value {
    if field == "submitted_at" {
        Value::String(response.submitted_at.to_rfc3339())
    } else {
        filter::flatten(&response.data).get(field).cloned().unwrap_or(Value::Null)
    }
}

fn cmp_sort_key(a: &FormResponse, b: &FormResponse, field: &str) -> Ordering {
    let av = sort_key_value(a, field);
    let bv = sort_key_value(b, field);
    match (av.as_f64(), bv.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => av.as_str().unwrap_or_default().cmp(bv.as_str().unwrap_or_default()),
    }
}
