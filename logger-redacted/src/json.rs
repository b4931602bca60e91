//! Redaction of structured submission payloads before they reach a
//! `tracing::event!`. Complements [`crate::redactor::PiiRedactor`], which
//! only scrubs free text — submission `data` (§4.5) and credential fields
//! (§4.1) need key-based redaction instead, since a value like an OTP or
//! password hash carries no detectable PII pattern of its own.

use crate::redactor::PiiRedactor;
use serde_json::Value;

/// Field names that are always replaced outright rather than pattern-matched,
/// regardless of which form/question they belong to.
pub const ALWAYS_REDACTED_KEYS: &[&str] = &["password", "otp", "token", "secret"];

/// Redact a JSON value for logging: known-sensitive keys are replaced with
/// `"[REDACTED]"`, and remaining string leaves pass through `redactor` for
/// pattern-based PII scrubbing (emails, phone numbers).
pub fn redact_for_log(value: &Value, redactor: &PiiRedactor) -> Value {
    redact_inner(value, redactor, ALWAYS_REDACTED_KEYS)
}

fn redact_inner(value: &Value, redactor: &PiiRedactor, redacted_keys: &[&str]) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, val) in map {
                let lowered = key.to_ascii_lowercase();
                if redacted_keys.iter().any(|k| lowered.contains(k)) {
                    out.insert(key.clone(), Value::String("[REDACTED]".to_string()));
                } else {
                    out.insert(key.clone(), redact_inner(val, redactor, redacted_keys));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| redact_inner(v, redactor, redacted_keys))
                .collect(),
        ),
        Value::String(s) => Value::String(redactor.redact(s)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redactor::RedactionConfig;
    use serde_json::json;

    #[test]
    fn redacts_known_sensitive_keys_outright() {
        let redactor = PiiRedactor::new(RedactionConfig::default());
        let payload = json!({
            "username": "alice",
            "password": "hunter2",
            "otp": "483920",
        });
        let out = redact_for_log(&payload, &redactor);
        assert_eq!(out["password"], json!("[REDACTED]"));
        assert_eq!(out["otp"], json!("[REDACTED]"));
        assert_eq!(out["username"], json!("alice"));
    }

    #[test]
    fn redacts_pii_patterns_in_nested_answers() {
        let redactor = PiiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        });
        let payload = json!({
            "answers": {
                "q_contact": "reach me at jane.doe@example.com"
            }
        });
        let out = redact_for_log(&payload, &redactor);
        let contact = out["answers"]["q_contact"].as_str().unwrap_or_default();
        assert!(contact.contains("j***@e***"));
    }
}
