use error_common::{ConflictReason, Kind, RustCareError};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("form not found")]
    FormNotFound,
    #[error("version '{0}' not found")]
    VersionNotFound(String),
    #[error("slug '{0}' already in use")]
    DuplicateSlug(String),
    #[error("version '{0}' already exists on this form")]
    DuplicateVersion(String),
    #[error("reorder set does not match the target list exactly: {0}")]
    OrderMismatch(String),
    #[error("invalid status transition: {0}")]
    InvalidTransition(String),
    #[error("condition rejected: {0}")]
    InvalidCondition(#[from] expr_eval::ExprError),
    #[error("invalid CSV import: {0}")]
    ImportFailed(String),
    #[error("question/section '{0}' not found")]
    FieldNotFound(Uuid),
}

use uuid::Uuid;

pub type Result<T> = std::result::Result<T, SchemaError>;

impl From<SchemaError> for RustCareError {
    fn from(err: SchemaError) -> Self {
        match &err {
            SchemaError::FormNotFound | SchemaError::VersionNotFound(_) | SchemaError::FieldNotFound(_) => {
                RustCareError::not_found(err.to_string())
            }
            SchemaError::DuplicateSlug(_) => {
                RustCareError::new(Kind::Conflict(ConflictReason::DuplicateSlug), err.to_string())
            }
            SchemaError::DuplicateVersion(_) => {
                RustCareError::new(Kind::Conflict(ConflictReason::DuplicateVersion), err.to_string())
            }
            SchemaError::OrderMismatch(_) | SchemaError::ImportFailed(_) => {
                RustCareError::new(Kind::Validation, err.to_string())
            }
            SchemaError::InvalidTransition(_) => RustCareError::state_error(err.to_string()),
            SchemaError::InvalidCondition(_) => RustCareError::new(Kind::InvalidCondition, err.to_string()),
        }
    }
}
