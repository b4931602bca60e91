use error_common::RustCareError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ResponseStoreError {
    #[error("response {0} not found")]
    NotFound(Uuid),
    #[error("response {0} has been soft-deleted")]
    AlreadyDeleted(Uuid),
    #[error("response {0} is not deleted")]
    NotDeleted(Uuid),
    #[error("only the original submitter may update this response")]
    NotSubmitter,
    #[error("invalid approval transition: {0}")]
    InvalidTransition(String),
    #[error(transparent)]
    Validation(#[from] form_validator::ValidatorError),
    #[error("malformed pagination cursor")]
    BadCursor,
}

pub type Result<T> = std::result::Result<T, ResponseStoreError>;

impl From<ResponseStoreError> for RustCareError {
    fn from(err: ResponseStoreError) -> Self {
        match err {
            ResponseStoreError::NotFound(_) => RustCareError::not_found("response not found"),
            ResponseStoreError::AlreadyDeleted(_)
            | ResponseStoreError::NotDeleted(_)
            | ResponseStoreError::InvalidTransition(_)
            | ResponseStoreError::BadCursor => RustCareError::state_error(err.to_string()),
            ResponseStoreError::NotSubmitter => {
                RustCareError::permission_denied("not the original submitter")
            }
            ResponseStoreError::Validation(e) => e.into(),
        }
    }
}
