use error_common::RustCareError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

pub type EmailResult<T> = Result<T, EmailError>;

impl From<EmailError> for RustCareError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::SendFailed(msg) => RustCareError::internal(msg),
        }
    }
}
