use crate::error::{ExportError, Result};
use response_store::filter::flatten;
use response_store::FormResponse;
use schema_engine::FormVersion;
use serde_json::Value;

struct Column {
    header: String,
    field_id: String,
}

fn columns(version: &FormVersion) -> Vec<Column> {
    let mut out = Vec::new();
    for section in &version.sections {
        for question in &section.questions {
            out.push(Column {
                header: format!("{}.{}", section.title, question.label),
                field_id: question.id.to_string(),
            });
        }
    }
    out
}

/// §4.12 CSV export: one row per response, flattened `(section.question)`
/// columns followed by `response_id, submitted_by, submitted_at, status`;
/// checkbox (array-valued) answers join with `|`.
pub fn export_csv(version: &FormVersion, responses: &[FormResponse]) -> Result<String> {
    let columns = columns(version);

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    let mut header: Vec<&str> = columns.iter().map(|c| c.header.as_str()).collect();
    header.extend(["response_id", "submitted_by", "submitted_at", "status"]);
    writer.write_record(&header).map_err(|e| ExportError::Csv(e.to_string()))?;

    for response in responses {
        let flat = flatten(&response.data);
        let mut row: Vec<String> = columns
            .iter()
            .map(|c| flat.get(&c.field_id).map(cell_value).unwrap_or_default())
            .collect();
        row.push(response.id.to_string());
        row.push(response.submitted_by.map(|u| u.to_string()).unwrap_or_default());
        row.push(response.submitted_at.to_rfc3339());
        row.push(status_key(response.status));
        writer.write_record(&row).map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}

fn cell_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join("|"),
        other => plain(other),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn status_key(status: response_store::ApprovalStatus) -> String {
    use response_store::ApprovalStatus::*;
    match status {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
    .to_string()
}
