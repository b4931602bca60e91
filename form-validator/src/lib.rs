//! The submission validator (§4.4): visibility/required condition
//! evaluation, hidden-field stripping, and per-`field_type` checks, driven
//! by a `schema_engine::FormVersion`.

pub mod error;
pub mod validate;

pub use error::{FieldIssue, Result, ValidatorError};
pub use validate::{check_submission_gates, validate_submission, FileUpload, ValidationRequest};

#[cfg(test)]
mod tests {
    use super::*;
    use platform_config::ValidatorConfig;
    use schema_engine::*;
    use serde_json::json;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn question(id: Uuid, field_type: FieldType, required: bool, order: u32) -> Question {
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
            meta_data: json!({}),
        }
    }

    fn section_with(id: Uuid, questions: Vec<Question>) -> Section {
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

    fn version_with(sections: Vec<Section>) -> FormVersion {
        FormVersion {
            version: "1.0".to_string(),
            created_by: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            sections,
            translations: HashMap::new(),
        }
    }

    fn submission(section_id: Uuid, fields: &[(Uuid, serde_json::Value)]) -> serde_json::Value {
        let mut instance = serde_json::Map::new();
        for (id, value) in fields {
            instance.insert(id.to_string(), value.clone());
        }
        let mut root = serde_json::Map::new();
        root.insert(section_id.to_string(), serde_json::Value::Object(instance));
        serde_json::Value::Object(root)
    }

    #[test]
    fn required_field_missing_is_rejected() {
        let q_id = Uuid::new_v4();
        let section_id = Uuid::new_v4();
        let version = version_with(vec![section_with(section_id, vec![question(q_id, FieldType::Input, true, 0)])]);
        let raw = submission(section_id, &[]);
        let files = HashMap::new();
        let config = ValidatorConfig::default();
        let request = ValidationRequest { version: &version, raw: &raw, files: &files, is_draft: false, config: &config };
        let err = validate_submission(&request).unwrap_err();
        assert!(matches!(err, ValidatorError::Fields(issues) if issues.len() == 1));
    }

    #[test]
    fn draft_mode_skips_required_check() {
        let q_id = Uuid::new_v4();
        let section_id = Uuid::new_v4();
        let version = version_with(vec![section_with(section_id, vec![question(q_id, FieldType::Input, true, 0)])]);
        let raw = submission(section_id, &[]);
        let files = HashMap::new();
        let config = ValidatorConfig::default();
        let request = ValidationRequest { version: &version, raw: &raw, files: &files, is_draft: true, config: &config };
        assert!(validate_submission(&request).is_ok());
    }

    #[test]
    fn conditional_required_fires_only_when_condition_true() {
        let q_cat = Uuid::new_v4();
        let q_explain = Uuid::new_v4();
        let section_id = Uuid::new_v4();
        let mut cat = question(q_cat, FieldType::Input, false, 0);
        cat.id = q_cat;
        let mut explain = question(q_explain, FieldType::Input, false, 1);
        explain.required_condition = Some(format!("answers.get('{q_cat}') == 'other'"));
        let version = version_with(vec![section_with(section_id, vec![cat, explain])]);
        let files = HashMap::new();
        let config = ValidatorConfig::default();

        let raw = submission(section_id, &[(q_cat, json!("other"))]);
        let request = ValidationRequest { version: &version, raw: &raw, files: &files, is_draft: false, config: &config };
        let err = validate_submission(&request).unwrap_err();
        assert!(matches!(err, ValidatorError::Fields(_)));

        let raw = submission(section_id, &[(q_cat, json!("main"))]);
        let request = ValidationRequest { version: &version, raw: &raw, files: &files, is_draft: false, config: &config };
        assert!(validate_submission(&request).is_ok());
    }

    #[test]
    fn hidden_field_is_stripped_from_stored_data() {
        let q_visible = Uuid::new_v4();
        let q_hidden = Uuid::new_v4();
        let section_id = Uuid::new_v4();
        let toggle = question(q_visible, FieldType::Boolean, false, 0);
        let mut hidden = question(q_hidden, FieldType::Input, false, 1);
        hidden.visibility_condition = Some(format!("answers.get('{q_visible}') == true"));
        let version = version_with(vec![section_with(section_id, vec![toggle, hidden])]);
        let raw = submission(section_id, &[(q_visible, json!(false)), (q_hidden, json!("secret"))]);
        let files = HashMap::new();
        let config = ValidatorConfig::default();
        let request = ValidationRequest { version: &version, raw: &raw, files: &files, is_draft: false, config: &config };
        let data = validate_submission(&request).unwrap();
        let instance = data
            .as_object()
            .and_then(|o| o.get(&section_id.to_string()))
            .and_then(|v| v.as_object())
            .unwrap();
        assert!(instance.get(&q_hidden.to_string()).is_none());
    }

    #[test]
    fn file_upload_rejects_disallowed_extension() {
        let q_id = Uuid::new_v4();
        let section_id = Uuid::new_v4();
        let version = version_with(vec![section_with(section_id, vec![question(q_id, FieldType::FileUpload, true, 0)])]);
        let raw = submission(section_id, &[(q_id, json!("uploads/x.exe"))]);
        let mut files = HashMap::new();
        files.insert(q_id, FileUpload { filename: "x.exe".to_string(), size_bytes: 10 });
        let config = ValidatorConfig::default();
        let request = ValidationRequest { version: &version, raw: &raw, files: &files, is_draft: false, config: &config };
        let err = validate_submission(&request).unwrap_err();
        assert!(matches!(err, ValidatorError::Fields(_)));
    }

    #[test]
    fn checkbox_enforces_option_membership() {
        let q_id = Uuid::new_v4();
        let section_id = Uuid::new_v4();
        let mut q = question(q_id, FieldType::Checkbox, false, 0);
        q.options = vec![QuestionOption {
            id: Uuid::new_v4(),
            option_label: "A".to_string(),
            option_value: json!("a"),
            is_default: false,
            is_disabled: false,
            order: 0,
            followup_visibility_condition: None,
        }];
        let version = version_with(vec![section_with(section_id, vec![q])]);
        let raw = submission(section_id, &[(q_id, json!(["not-an-option"]))]);
        let files = HashMap::new();
        let config = ValidatorConfig::default();
        let request = ValidationRequest { version: &version, raw: &raw, files: &files, is_draft: false, config: &config };
        assert!(validate_submission(&request).is_err());
    }
}
