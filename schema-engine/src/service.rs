use crate::error::*;
use crate::models::*;
use crate::repository::FormRepository;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

pub struct NewForm {
    pub title: String,
    pub slug: String,
    pub created_by: Uuid,
    pub is_public: bool,
    pub supported_languages: Vec<String>,
    pub default_language: String,
}

pub struct SchemaService {
    repository: Arc<dyn FormRepository>,
}

impl SchemaService {
    pub fn new(repository: Arc<dyn FormRepository>) -> Self {
        Self { repository }
    }

    /// §4.3 CreateForm: unique slug enforced by the repository, creator
    /// implicitly added to editors (§3 invariant).
    pub async fn create_form(&self, payload: NewForm) -> Result<Form> {
        let now = Utc::now();
        let mut editors = HashSet::new();
        editors.insert(payload.created_by.to_string());
        let form = Form {
            id: Uuid::new_v4(),
            title: payload.title,
            slug: payload.slug,
            created_by: payload.created_by,
            status: FormStatus::Draft,
            is_public: payload.is_public,
            expires_at: None,
            editors,
            viewers: HashSet::new(),
            submitters: HashSet::new(),
            supported_languages: payload.supported_languages,
            default_language: payload.default_language,
            webhooks: Vec::new(),
            notification_emails: Vec::new(),
            versions: Vec::new(),
            active_version: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.repository.create(form).await
    }

    pub async fn get_form(&self, form_id: Uuid) -> Result<Form> {
        self.repository.find_by_id(form_id).await?.ok_or(SchemaError::FormNotFound)
    }

    /// §3: status transitions form a DAG; idempotent for `target == current`
    /// (§8 property 11: `PATCH /publish` on an already-published form is a no-op).
    pub async fn transition_status(&self, form_id: Uuid, target: FormStatus) -> Result<Form> {
        let mut form = self.get_form(form_id).await?;
        if form.status == target {
            return Ok(form);
        }
        if !form.status.can_transition_to(target) {
            return Err(SchemaError::InvalidTransition(format!(
                "cannot transition form from {:?} to {:?}",
                form.status, target
            )));
        }
        form.status = target;
        form.updated_at = Utc::now();
        self.repository.update(form).await
    }

    /// §4.3 CreateVersion: validates every condition string against the
    /// whitelisted grammar before the version is ever stored, per §4.2's
    /// "reject at parse time, not at run time".
    pub async fn create_version(
        &self,
        form_id: Uuid,
        version: String,
        sections: Vec<Section>,
        created_by: Uuid,
        activate: bool,
    ) -> Result<Form> {
        let mut form = self.get_form(form_id).await?;
        if form.find_version(&version).is_some() {
            return Err(SchemaError::DuplicateVersion(version));
        }
        validate_conditions(&sections)?;
        let form_version = FormVersion {
            version: version.clone(),
            created_by,
            created_at: Utc::now(),
            sections,
            translations: HashMap::new(),
        };
        form.versions.push(form_version);
        if activate || form.active_version.is_empty() {
            form.active_version = version;
        }
        form.updated_at = Utc::now();
        self.repository.update(form).await
    }

    /// §4.3 ActivateVersion: read-modify-write on the form document;
    /// submissions already in flight keep whatever version they read (§5).
    pub async fn activate_version(&self, form_id: Uuid, version: &str) -> Result<Form> {
        let mut form = self.get_form(form_id).await?;
        if form.find_version(version).is_none() {
            return Err(SchemaError::VersionNotFound(version.to_string()));
        }
        if form.active_version == version {
            return Ok(form);
        }
        form.active_version = version.to_string();
        form.updated_at = Utc::now();
        self.repository.update(form).await
    }

    /// §4.3/§8 property 10: every id in `order` appears exactly once in the
    /// target version's sections; assigns `order` 0..n-1 and preserves
    /// section identity (same UUIDs, just reordered + renumbered).
    pub async fn reorder_sections(&self, form_id: Uuid, version: &str, order: &[Uuid]) -> Result<Form> {
        let mut form = self.get_form(form_id).await?;
        let form_version = form
            .versions
            .iter_mut()
            .find(|v| v.version == version)
            .ok_or_else(|| SchemaError::VersionNotFound(version.to_string()))?;
        form_version.sections = reorder_by_id(
            std::mem::take(&mut form_version.sections),
            order,
            |s| s.id,
            |s, i| s.order = i,
        )?;
        form.updated_at = Utc::now();
        self.repository.update(form).await
    }

    pub async fn reorder_questions(
        &self,
        form_id: Uuid,
        version: &str,
        section_id: Uuid,
        order: &[Uuid],
    ) -> Result<Form> {
        let mut form = self.get_form(form_id).await?;
        let form_version = form
            .versions
            .iter_mut()
            .find(|v| v.version == version)
            .ok_or_else(|| SchemaError::VersionNotFound(version.to_string()))?;
        let section = form_version
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or(SchemaError::FieldNotFound(section_id))?;
        section.questions = reorder_by_id(
            std::mem::take(&mut section.questions),
            order,
            |q| q.id,
            |q, i| q.order = i,
        )?;
        form.updated_at = Utc::now();
        self.repository.update(form).await
    }

    /// §4.3 ImportOptions: parses `{option_label, option_value}` CSV rows.
    pub async fn import_options(
        &self,
        form_id: Uuid,
        version: &str,
        section_id: Uuid,
        question_id: Uuid,
        csv_data: &str,
        replace: bool,
    ) -> Result<Form> {
        let mut reader = csv::Reader::from_reader(csv_data.as_bytes());
        let mut imported = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| SchemaError::ImportFailed(e.to_string()))?;
            let label = record
                .get(0)
                .ok_or_else(|| SchemaError::ImportFailed(format!("row {i}: missing option_label")))?;
            let value = record
                .get(1)
                .ok_or_else(|| SchemaError::ImportFailed(format!("row {i}: missing option_value")))?;
            imported.push(QuestionOption {
                id: Uuid::new_v4(),
                option_label: label.to_string(),
                option_value: serde_json::Value::String(value.to_string()),
                is_default: false,
                is_disabled: false,
                order: i as u32,
                followup_visibility_condition: None,
            });
        }

        let mut form = self.get_form(form_id).await?;
        let form_version = form
            .versions
            .iter_mut()
            .find(|v| v.version == version)
            .ok_or_else(|| SchemaError::VersionNotFound(version.to_string()))?;
        let question = form_version
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or(SchemaError::FieldNotFound(section_id))?
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or(SchemaError::FieldNotFound(question_id))?;

        if replace {
            question.options = imported;
        } else {
            let base = question.options.len() as u32;
            for (i, mut opt) in imported.into_iter().enumerate() {
                opt.order = base + i as u32;
                question.options.push(opt);
            }
        }
        form.updated_at = Utc::now();
        self.repository.update(form).await
    }

    /// §4.3 UpsertTranslations: merges at leaf (field id) level, never
    /// replacing the whole language map.
    pub async fn upsert_translations(
        &self,
        form_id: Uuid,
        version: &str,
        lang_code: &str,
        translations: HashMap<Uuid, String>,
    ) -> Result<Form> {
        let mut form = self.get_form(form_id).await?;
        let form_version = form
            .versions
            .iter_mut()
            .find(|v| v.version == version)
            .ok_or_else(|| SchemaError::VersionNotFound(version.to_string()))?;
        let lang_map = form_version.translations.entry(lang_code.to_string()).or_default();
        lang_map.extend(translations);
        form.updated_at = Utc::now();
        self.repository.update(form).await
    }
}

fn reorder_by_id<T>(
    items: Vec<T>,
    order: &[Uuid],
    id_of: impl Fn(&T) -> Uuid,
    set_order: impl Fn(&mut T, u32),
) -> Result<Vec<T>> {
    let existing: HashSet<Uuid> = items.iter().map(&id_of).collect();
    let requested: HashSet<Uuid> = order.iter().copied().collect();
    if existing != requested || order.len() != items.len() {
        return Err(SchemaError::OrderMismatch(
            "reorder set must contain exactly the target list's ids, each once".to_string(),
        ));
    }
    let mut by_id: HashMap<Uuid, T> = items.into_iter().map(|item| (id_of(&item), item)).collect();
    let mut reordered = Vec::with_capacity(order.len());
    for (i, id) in order.iter().enumerate() {
        if let Some(mut item) = by_id.remove(id) {
            set_order(&mut item, i as u32);
            reordered.push(item);
        }
    }
    Ok(reordered)
}

fn validate_conditions(sections: &[Section]) -> Result<()> {
    for section in sections {
        if let Some(cond) = &section.visibility_condition {
            expr_eval::parse(cond)?;
        }
        for question in &section.questions {
            if let Some(cond) = &question.visibility_condition {
                expr_eval::parse(cond)?;
            }
            if let Some(cond) = &question.required_condition {
                expr_eval::parse(cond)?;
            }
            for option in &question.options {
                if let Some(cond) = &option.followup_visibility_condition {
                    expr_eval::parse(cond)?;
                }
            }
        }
    }
    Ok(())
}
