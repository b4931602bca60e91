use crate::error::{ExportError, Result};
use response_store::FormResponse;
use schema_engine::Form;
use serde::Serialize;

#[derive(Serialize)]
struct JsonExport<'a> {
    form: &'a Form,
    responses: &'a [FormResponse],
}

/// §4.12 JSON export: `{form: <full form definition>, responses: [...]}`.
pub fn export_json(form: &Form, responses: &[FormResponse]) -> Result<String> {
    serde_json::to_string_pretty(&JsonExport { form, responses })
        .map_err(|e| ExportError::Json(e.to_string()))
}
