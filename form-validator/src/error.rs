use error_common::{FieldError, Kind, RustCareError};

#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// §7 `StateError`: `form.status != published`, expired, or
    /// public-submit against a private form.
    #[error("{0}")]
    State(String),
    /// §7 `ValidationError`, field-level — the §4.4 algorithm's output.
    #[error("submission failed validation with {} error(s)", .0.len())]
    Fields(Vec<FieldIssue>),
}

#[derive(Debug, Clone)]
pub struct FieldIssue {
    pub id: String,
    pub error: String,
    pub path: String,
}

pub type Result<T> = std::result::Result<T, ValidatorError>;

impl From<ValidatorError> for RustCareError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::State(msg) => RustCareError::state_error(msg),
            ValidatorError::Fields(issues) => RustCareError::validation(
                issues
                    .into_iter()
                    .map(|i| FieldError { field: i.path, kind: i.id, message: i.error })
                    .collect(),
            ),
        }
    }
}
