//! Error reporting hook — components call this for `Kind::Internal` errors
//! that should surface somewhere beyond the structured log line.

use crate::types::RustCareError;

pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, error: &RustCareError) {
        tracing::error!(
            kind = %error.kind,
            error_id = %error.error_id,
            "internal error"
        );
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
