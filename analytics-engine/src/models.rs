use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// §4.11 `Summary(form_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    pub drafts: u64,
    pub last_submitted_at: Option<DateTime<Utc>>,
}

/// One day's count in a `Timeline(form_id, days)` series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub count: u64,
}

/// `option_value -> count` tally for one select/radio/checkbox question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDistribution {
    pub question_id: Uuid,
    pub counts: BTreeMap<String, u64>,
}
