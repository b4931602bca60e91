use crate::models::{QuestionDistribution, Summary, TimelinePoint};
use chrono::{DateTime, Duration, Utc};
use response_store::{filter::flatten, ApprovalStatus, FormResponse};
use schema_engine::{FieldType, FormVersion};
use serde_json::Value;
use std::collections::BTreeMap;

fn live(responses: &[FormResponse]) -> impl Iterator<Item = &FormResponse> {
    responses.iter().filter(|r| !r.deleted && !r.is_draft)
}

/// §4.11 `Summary`: totals and per-status counts ignore drafts and
/// soft-deleted responses; `drafts` is the one field that counts them,
/// reported separately so the caller can still see how many are pending.
pub fn summary(responses: &[FormResponse]) -> Summary {
    let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
    let mut total = 0u64;
    let mut last_submitted_at = None;

    for r in live(responses) {
        total += 1;
        *by_status.entry(status_key(r.status)).or_insert(0) += 1;
        last_submitted_at = Some(match last_submitted_at {
            Some(prev) if prev >= r.submitted_at => prev,
            _ => r.submitted_at,
        });
    }

    let drafts = responses.iter().filter(|r| !r.deleted && r.is_draft).count() as u64;

    Summary { total, by_status, drafts, last_submitted_at }
}

fn status_key(status: ApprovalStatus) -> String {
    match status {
        ApprovalStatus::Pending => "pending",
        ApprovalStatus::Approved => "approved",
        ApprovalStatus::Rejected => "rejected",
    }
    .to_string()
}

/// §4.11 `Timeline(form_id, days)`: daily submission counts for the `days`
/// calendar days ending on `as_of` (inclusive), oldest first.
pub fn timeline(responses: &[FormResponse], days: u32, as_of: DateTime<Utc>) -> Vec<TimelinePoint> {
    let end_date = as_of.date_naive();
    let start_date = end_date - Duration::days(days.saturating_sub(1) as i64);

    let mut counts: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
    let mut date = start_date;
    while date <= end_date {
        counts.insert(date, 0);
        date += Duration::days(1);
    }

    for r in live(responses) {
        let d = r.submitted_at.date_naive();
        if d >= start_date && d <= end_date {
            *counts.entry(d).or_insert(0) += 1;
        }
    }

    counts.into_iter().map(|(date, count)| TimelinePoint { date, count }).collect()
}

/// §4.11 `Distribution(form_id)`: `option_value -> count` for every
/// select/radio/checkbox question in `version`. Checkbox answers are
/// stored as a JSON array; every element contributes one tally.
pub fn distribution(responses: &[FormResponse], version: &FormVersion) -> Vec<QuestionDistribution> {
    let flattened: Vec<_> = live(responses).map(|r| flatten(&r.data)).collect();

    let mut out = Vec::new();
    for section in &version.sections {
        for question in &section.questions {
            if !matches!(question.field_type, FieldType::Select | FieldType::Radio | FieldType::Checkbox) {
                continue;
            }
            let field_id = question.id.to_string();
            let mut counts: BTreeMap<String, u64> = BTreeMap::new();
            for flat in &flattened {
                let Some(value) = flat.get(&field_id) else { continue };
                tally(value, &mut counts);
            }
            out.push(QuestionDistribution { question_id: question.id, counts });
        }
    }
    out
}

fn tally(value: &Value, counts: &mut BTreeMap<String, u64>) {
    match value {
        Value::Array(items) => {
            for item in items {
                *counts.entry(value_key(item)).or_insert(0) += 1;
            }
        }
        Value::Null => {}
        other => *counts.entry(value_key(other)).or_insert(0) += 1,
    }
}

fn value_key(v: &Value) -> String {
    v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string())
}
