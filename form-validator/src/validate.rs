use crate::error::{FieldIssue, ValidatorError};
use chrono::{DateTime, Utc};
use expr_eval::Vars;
use platform_config::ValidatorConfig;
use regex::Regex;
use schema_engine::{FieldType, Form, FormStatus, FormVersion, Question, Section};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub size_bytes: u64,
}

pub struct ValidationRequest<'a> {
    pub version: &'a FormVersion,
    /// `section_id (string) -> (field_id -> value) | [instance, ...]`, per §4.5's stored layout.
    pub raw: &'a Value,
    pub files: &'a HashMap<Uuid, FileUpload>,
    pub is_draft: bool,
    pub config: &'a ValidatorConfig,
}

/// §4.4's status/expiry/visibility gates, rejected before any field
/// validation runs. Submitter permission (§4.6) is resolved by
/// `access-control` and checked by the caller before this point — kept out
/// of this crate to avoid a dependency from the validator onto identity.
pub fn check_submission_gates(form: &Form, is_public_submit: bool, now: DateTime<Utc>) -> crate::error::Result<()> {
    if form.status != FormStatus::Published {
        return Err(ValidatorError::State("form is not published".to_string()));
    }
    if let Some(expires_at) = form.expires_at {
        if now >= expires_at {
            return Err(ValidatorError::State("form has expired".to_string()));
        }
    }
    if is_public_submit && !form.is_public {
        return Err(ValidatorError::State("form does not accept anonymous submissions".to_string()));
    }
    Ok(())
}

/// §4.4: runs the full per-section/per-question algorithm, returning the
/// hidden-field-stripped, type-checked submission data or the field error
/// list.
pub fn validate_submission(request: &ValidationRequest<'_>) -> crate::error::Result<Value> {
    let flat = flatten_for_conditions(request.raw);
    let mut output = Map::new();
    let mut issues = Vec::new();

    let mut sections: Vec<&Section> = request.version.sections.iter().collect();
    sections.sort_by_key(|s| s.order);

    for section in sections {
        if let Some(cond) = &section.visibility_condition {
            if !eval_condition(cond, &flat) {
                continue;
            }
        }

        let raw_section = request.raw.as_object().and_then(|o| o.get(&section.id.to_string()));

        if section.is_repeatable_section {
            let instances = raw_section.and_then(Value::as_array).cloned().unwrap_or_default();
            if !request.is_draft {
                let min = section.repeat_min as usize;
                let max = section.repeat_max.map(|m| m as usize);
                if instances.len() < min || max.is_some_and(|max| instances.len() > max) {
                    issues.push(FieldIssue {
                        id: section.id.to_string(),
                        error: "repeat count out of range".to_string(),
                        path: section.id.to_string(),
                    });
                }
            }
            let mut validated = Vec::with_capacity(instances.len());
            for (idx, instance) in instances.iter().enumerate() {
                let (out, mut inst_issues) = validate_section_instance(section, instance, &flat, request, idx);
                issues.append(&mut inst_issues);
                validated.push(Value::Object(out));
            }
            output.insert(section.id.to_string(), Value::Array(validated));
        } else {
            let instance = raw_section.cloned().unwrap_or_else(|| Value::Object(Map::new()));
            let (out, mut inst_issues) = validate_section_instance(section, &instance, &flat, request, 0);
            issues.append(&mut inst_issues);
            output.insert(section.id.to_string(), Value::Object(out));
        }
    }

    if issues.is_empty() {
        Ok(Value::Object(output))
    } else {
        Err(ValidatorError::Fields(issues))
    }
}

fn validate_section_instance(
    section: &Section,
    instance: &Value,
    flat: &Vars,
    request: &ValidationRequest<'_>,
    idx: usize,
) -> (Map<String, Value>, Vec<FieldIssue>) {
    let mut out = Map::new();
    let mut issues = Vec::new();
    let instance_obj = instance.as_object();

    let mut questions: Vec<&Question> = section.questions.iter().collect();
    questions.sort_by_key(|q| q.order);

    for question in questions {
        if let Some(cond) = &question.visibility_condition {
            if !eval_condition(cond, flat) {
                continue;
            }
        }
        let raw_value = instance_obj.and_then(|o| o.get(&question.id.to_string()));
        let path = format!("{}[{}].{}", section.id, idx, question.id);
        let (value, mut q_issues) = validate_question(question, raw_value, flat, request, &path);
        issues.append(&mut q_issues);
        if let Some(value) = value {
            out.insert(question.id.to_string(), value);
        }
    }
    (out, issues)
}

fn validate_question(
    question: &Question,
    raw_value: Option<&Value>,
    flat: &Vars,
    request: &ValidationRequest<'_>,
    path: &str,
) -> (Option<Value>, Vec<FieldIssue>) {
    let mut issues = Vec::new();

    // §4.4 rule 4 calculated: server-recomputed, client value ignored.
    if question.field_type == FieldType::Calculated {
        return (Some(compute_calculated(question, flat)), issues);
    }
    // Layout-only types never carry a value.
    if matches!(question.field_type, FieldType::Divider | FieldType::Spacer | FieldType::Image) {
        return (None, issues);
    }

    let effective_required = question.is_required
        || question
            .required_condition
            .as_deref()
            .is_some_and(|cond| eval_condition(cond, flat));

    let has_value = raw_value.is_some_and(|v| !v.is_null());
    if !has_value {
        if effective_required && !request.is_draft {
            issues.push(FieldIssue { id: question.id.to_string(), error: "Required".to_string(), path: path.to_string() });
        }
        return (None, issues);
    }
    let value = raw_value.expect("has_value implies Some");

    if question.is_repeatable_question {
        return validate_repeatable(question, value, request, path);
    }

    type_check(question, value, request, path)
}

fn validate_repeatable(
    question: &Question,
    value: &Value,
    request: &ValidationRequest<'_>,
    path: &str,
) -> (Option<Value>, Vec<FieldIssue>) {
    let mut issues = Vec::new();
    let Some(items) = value.as_array() else {
        issues.push(FieldIssue {
            id: question.id.to_string(),
            error: "expected an array for a repeatable question".to_string(),
            path: path.to_string(),
        });
        return (None, issues);
    };
    if !request.is_draft {
        let min = question.repeat_min as usize;
        let max = question.repeat_max.map(|m| m as usize);
        if items.len() < min || max.is_some_and(|max| items.len() > max) {
            issues.push(FieldIssue {
                id: question.id.to_string(),
                error: "repeat count out of range".to_string(),
                path: path.to_string(),
            });
        }
    }
    let mut validated = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{i}]");
        let (v, mut item_issues) = type_check(question, item, request, &item_path);
        issues.append(&mut item_issues);
        if let Some(v) = v {
            validated.push(v);
        }
    }
    (Some(Value::Array(validated)), issues)
}

fn type_check(
    question: &Question,
    value: &Value,
    request: &ValidationRequest<'_>,
    path: &str,
) -> (Option<Value>, Vec<FieldIssue>) {
    let mut issues = Vec::new();
    let err = |message: &str| FieldIssue { id: question.id.to_string(), error: message.to_string(), path: path.to_string() };

    match question.field_type {
        FieldType::Input | FieldType::Textarea | FieldType::Signature => match value.as_str() {
            Some(s) => {
                if !request.is_draft {
                    if let Some(min) = question.validation_rules.get_u64("min_length") {
                        if (s.chars().count() as u64) < min {
                            issues.push(err("below min_length"));
                        }
                    }
                    if let Some(max) = question.validation_rules.get_u64("max_length") {
                        if (s.chars().count() as u64) > max {
                            issues.push(err("exceeds max_length"));
                        }
                    }
                    if let Some(pattern) = question.validation_rules.get_str("pattern") {
                        match Regex::new(pattern) {
                            Ok(re) if !re.is_match(s) => issues.push(err("does not match pattern")),
                            Err(e) => tracing::error!(pattern, error = %e, "invalid validation_rules.pattern regex"),
                            _ => {}
                        }
                    }
                }
                (Some(Value::String(s.to_string())), issues)
            }
            None => {
                issues.push(err("expected a string"));
                (None, issues)
            }
        },
        FieldType::Rating | FieldType::Slider => match value.as_f64() {
            Some(n) => {
                if !request.is_draft {
                    if let Some(min) = question.validation_rules.get_f64("min") {
                        if n < min {
                            issues.push(err("below min"));
                        }
                    }
                    if let Some(max) = question.validation_rules.get_f64("max") {
                        if n > max {
                            issues.push(err("above max"));
                        }
                    }
                    if let Some(step) = question.validation_rules.get_f64("step") {
                        if step > 0.0 {
                            let min = question.validation_rules.get_f64("min").unwrap_or(0.0);
                            let steps = (n - min) / step;
                            if (steps - steps.round()).abs() > f64::EPSILON {
                                issues.push(err("does not satisfy step"));
                            }
                        }
                    }
                }
                (Some(Value::from(n)), issues)
            }
            None => {
                issues.push(err("expected a number"));
                (None, issues)
            }
        },
        FieldType::Select | FieldType::Radio => {
            let matches = question
                .options
                .iter()
                .any(|o| !o.is_disabled && &o.option_value == value);
            if matches {
                (Some(value.clone()), issues)
            } else {
                issues.push(err("value does not match any option"));
                (None, issues)
            }
        }
        FieldType::Checkbox => match value.as_array() {
            Some(items) => {
                let allowed: Vec<&Value> = question
                    .options
                    .iter()
                    .filter(|o| !o.is_disabled)
                    .map(|o| &o.option_value)
                    .collect();
                let mut bad = false;
                for item in items {
                    if !allowed.contains(&item) {
                        bad = true;
                    }
                }
                if bad {
                    issues.push(err("one or more selections are not valid options"));
                }
                if !request.is_draft {
                    if let Some(min) = question.validation_rules.get_u64("min_selections") {
                        if (items.len() as u64) < min {
                            issues.push(err("below min_selections"));
                        }
                    }
                    if let Some(max) = question.validation_rules.get_u64("max_selections") {
                        if (items.len() as u64) > max {
                            issues.push(err("exceeds max_selections"));
                        }
                    }
                }
                (Some(value.clone()), issues)
            }
            None => {
                issues.push(err("expected an array of selections"));
                (None, issues)
            }
        },
        FieldType::Boolean => match coerce_bool(value) {
            Some(b) => (Some(Value::Bool(b)), issues),
            None => {
                issues.push(err("expected a boolean"));
                (None, issues)
            }
        },
        FieldType::Date => match value.as_str() {
            Some(s) if DateTime::parse_from_rfc3339(s).is_ok() || s.parse::<chrono::NaiveDate>().is_ok() => {
                (Some(Value::String(s.to_string())), issues)
            }
            _ => {
                issues.push(err("expected an ISO-8601 date"));
                (None, issues)
            }
        },
        FieldType::FileUpload => {
            match request.files.get(&question.id) {
                Some(file) => {
                    if file.size_bytes > request.config.max_file_size_bytes {
                        issues.push(err("file exceeds the maximum upload size"));
                    }
                    let ext = file.filename.rsplit('.').next().unwrap_or("").to_lowercase();
                    if !request.config.allowed_file_extensions.iter().any(|allowed| allowed == &ext) {
                        issues.push(err("file extension is not allowed"));
                    }
                    (Some(value.clone()), issues)
                }
                None => {
                    issues.push(err("no uploaded file found for this field"));
                    (None, issues)
                }
            }
        }
        FieldType::MatrixChoice => {
            let rows: Vec<String> = question
                .meta_data
                .get("rows")
                .and_then(Value::as_array)
                .map(|rows| rows.iter().filter_map(|r| r.as_str().map(str::to_string)).collect())
                .unwrap_or_default();
            let columns: Vec<&Value> = question
                .meta_data
                .get("columns")
                .and_then(Value::as_array)
                .map(|cols| cols.iter().collect())
                .unwrap_or_default();
            match value.as_object() {
                Some(selections) => {
                    for row in &rows {
                        match selections.get(row) {
                            Some(selected) if columns.contains(&selected) => {}
                            Some(_) => issues.push(err(&format!("row '{row}' selection is not a valid column"))),
                            None => issues.push(err(&format!("row '{row}' has no selection"))),
                        }
                    }
                    (Some(value.clone()), issues)
                }
                None => {
                    issues.push(err("expected a row -> column selection map"));
                    (None, issues)
                }
            }
        }
        FieldType::ApiSearch => (Some(value.clone()), issues),
        FieldType::Divider | FieldType::Spacer | FieldType::Image | FieldType::Calculated => (None, issues),
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        _ => None,
    }
}

fn compute_calculated(question: &Question, flat: &Vars) -> Value {
    let Some(src) = question.meta_data.get("calculated_value").and_then(Value::as_str) else {
        return Value::Null;
    };
    match expr_eval::parse(src).and_then(|expr| expr_eval::evaluate(&expr, flat)) {
        Ok(value) => expr_value_to_json(&value),
        Err(err) => {
            tracing::warn!(error = %err, "calculated_value evaluation failed, storing null");
            Value::Null
        }
    }
}

fn expr_value_to_json(value: &expr_eval::Value) -> Value {
    match value {
        expr_eval::Value::Null => Value::Null,
        expr_eval::Value::Bool(b) => Value::Bool(*b),
        expr_eval::Value::Number(n) => serde_json::Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
        expr_eval::Value::Str(s) => Value::String(s.clone()),
        expr_eval::Value::List(items) => Value::Array(items.iter().map(expr_value_to_json).collect()),
    }
}

fn eval_condition(cond: &str, flat: &Vars) -> bool {
    match expr_eval::parse(cond) {
        Ok(expr) => expr_eval::eval_bool(&expr, flat),
        Err(err) => {
            tracing::error!(error = %err, cond, "condition failed to re-parse at evaluation time, treating as false");
            false
        }
    }
}

/// Flattens the submitted `section -> field` (or `section -> [instance]`)
/// layout into the `answers` namespace conditions are evaluated against.
/// Repeated-section instances fold last-write-wins, the same documented
/// limitation as response-store's search flattening (§4.5).
fn flatten_for_conditions(raw: &Value) -> Vars {
    let mut vars = Vars::new();
    let Some(sections) = raw.as_object() else {
        return vars;
    };
    for section_value in sections.values() {
        match section_value {
            Value::Array(instances) => {
                for instance in instances {
                    if let Some(fields) = instance.as_object() {
                        for (k, v) in fields {
                            vars.insert(k.clone(), expr_eval::Value::from_json(v));
                        }
                    }
                }
            }
            Value::Object(fields) => {
                for (k, v) in fields {
                    vars.insert(k.clone(), expr_eval::Value::from_json(v));
                }
            }
            _ => {}
        }
    }
    vars
}
