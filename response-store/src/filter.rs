use crate::models::{FilterNode, FilterOp};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// §4.5: search flattens the `section_id -> (fields | [instances])` stored
/// layout to `field_id -> value`, last-write-wins across repeat instances —
/// the same documented limitation `form-validator` uses for conditions.
pub fn flatten(data: &Value) -> HashMap<String, Value> {
    let mut flat = HashMap::new();
    let Some(sections) = data.as_object() else {
        return flat;
    };
    for section_value in sections.values() {
        match section_value {
            Value::Array(instances) => {
                for instance in instances {
                    if let Some(fields) = instance.as_object() {
                        for (k, v) in fields {
                            flat.insert(k.clone(), v.clone());
                        }
                    }
                }
            }
            Value::Object(fields) => {
                for (k, v) in fields {
                    flat.insert(k.clone(), v.clone());
                }
            }
            _ => {}
        }
    }
    flat
}

pub fn matches(node: &FilterNode, flat: &HashMap<String, Value>, submitted_at: DateTime<Utc>) -> bool {
    match node {
        FilterNode::Leaf { field_id, op, value } => {
            let actual = flat.get(field_id).cloned().unwrap_or(Value::Null);
            compare(&actual, *op, value)
        }
        FilterNode::DateRange { from, to } => {
            from.map_or(true, |f| submitted_at >= f) && to.map_or(true, |t| submitted_at <= t)
        }
        FilterNode::And(children) => children.iter().all(|c| matches(c, flat, submitted_at)),
        FilterNode::Or(children) => children.iter().any(|c| matches(c, flat, submitted_at)),
        FilterNode::Not(child) => !matches(child, flat, submitted_at),
    }
}

fn compare(actual: &Value, op: FilterOp, expected: &Value) -> bool {
    match op {
        FilterOp::Eq => actual == expected,
        FilterOp::Ne => actual != expected,
        FilterOp::Icontains => match (actual.as_str(), expected.as_str()) {
            (Some(a), Some(e)) => a.to_lowercase().contains(&e.to_lowercase()),
            _ => false,
        },
        FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
            match (as_comparable(actual), as_comparable(expected)) {
                (Some(a), Some(e)) => match op {
                    FilterOp::Gt => a > e,
                    FilterOp::Gte => a >= e,
                    FilterOp::Lt => a < e,
                    FilterOp::Lte => a <= e,
                    _ => unreachable!(),
                },
                None => false,
            }
        }
    }
}

fn as_comparable(v: &Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}
