//! PII redaction for structured logs.
//!
//! Submission payloads (§4.5's `data`) and auth secrets (§4.1's password/OTP
//! fields) must never reach a log line unredacted. [`redact_for_log`] is the
//! one entry point other crates call before a `tracing::event!` that carries
//! either kind of payload.
//!
//! ```
//! use logger_redacted::{redact_for_log, PiiRedactor, RedactionConfig};
//! use serde_json::json;
//!
//! let redactor = PiiRedactor::new(RedactionConfig::default());
//! let data = json!({ "password": "hunter2", "q_email": "a@example.com" });
//! let safe = redact_for_log(&data, &redactor);
//! tracing::info!(data = %safe, "submission received");
//! ```

pub mod config;
pub mod json;
pub mod redactor;

pub use config::LoggerConfig;
pub use json::{redact_for_log, ALWAYS_REDACTED_KEYS};
pub use redactor::{PiiRedactor, RedactionConfig};
