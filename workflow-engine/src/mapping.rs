use response_store::FormResponse;
use serde_json::Value;
use std::collections::BTreeMap;

/// §4.8 "Data mapping resolution": for each `(target_field, source_key)`,
/// `id`/`submitted_at`/`submitted_by`/`version` resolve from the response
/// header, dotted keys walk into `data`, everything else is a flat-answers
/// lookup.
pub fn resolve_data_mapping(
    data_mapping: &BTreeMap<String, String>,
    response: &FormResponse,
    flat_answers: &std::collections::HashMap<String, Value>,
) -> Value {
    let mut resolved = serde_json::Map::new();
    for (target_field, source_key) in data_mapping {
        let value = resolve_one(source_key, response, flat_answers);
        resolved.insert(target_field.clone(), value);
    }
    Value::Object(resolved)
}

fn resolve_one(
    source_key: &str,
    response: &FormResponse,
    flat_answers: &std::collections::HashMap<String, Value>,
) -> Value {
    match source_key {
        "id" => Value::String(response.id.to_string()),
        "submitted_at" => Value::String(response.submitted_at.to_rfc3339()),
        "submitted_by" => response
            .submitted_by
            .map(|id| Value::String(id.to_string()))
            .unwrap_or(Value::Null),
        "version" => Value::String(response.version.clone()),
        key if key.contains('.') => dotted_lookup(&response.data, key),
        key => flat_answers.get(key).cloned().unwrap_or(Value::Null),
    }
}

fn dotted_lookup(data: &Value, path: &str) -> Value {
    path.split('.').fold(data.clone(), |acc, segment| {
        acc.as_object()
            .and_then(|o| o.get(segment))
            .cloned()
            .unwrap_or(Value::Null)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use response_store::{ApprovalStatus, ResponseMetadata};
    use std::collections::HashMap;
    use uuid::Uuid;

    fn sample_response() -> FormResponse {
        FormResponse {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            version: "1".to_string(),
            submitted_by: Some(Uuid::new_v4()),
            submitted_at: Utc::now(),
            updated_by: None,
            updated_at: None,
            deleted: false,
            deleted_by: None,
            deleted_at: None,
            is_draft: false,
            status: ApprovalStatus::Pending,
            status_log: Vec::new(),
            data: serde_json::json!({ "sec-1": { "q1": { "nested": "value" } } }),
            metadata: ResponseMetadata::default(),
        }
    }

    #[test]
    fn header_keys_resolve_from_the_response() {
        let response = sample_response();
        let mapping = BTreeMap::from([("target_id".to_string(), "id".to_string())]);
        let resolved = resolve_data_mapping(&mapping, &response, &HashMap::new());
        assert_eq!(resolved["target_id"], response.id.to_string());
    }

    #[test]
    fn dotted_keys_walk_into_nested_data() {
        let response = sample_response();
        let mapping = BTreeMap::from([("target".to_string(), "sec-1.q1".to_string())]);
        let resolved = resolve_data_mapping(&mapping, &response, &HashMap::new());
        assert_eq!(resolved["target"]["nested"], "value");
    }

    #[test]
    fn plain_keys_resolve_from_flat_answers() {
        let response = sample_response();
        let mut flat = HashMap::new();
        flat.insert("email".to_string(), serde_json::json!("a@b.com"));
        let mapping = BTreeMap::from([("notify_email".to_string(), "email".to_string())]);
        let resolved = resolve_data_mapping(&mapping, &response, &flat);
        assert_eq!(resolved["notify_email"], "a@b.com");
    }
}
