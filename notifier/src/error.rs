use error_common::RustCareError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("gateway send failed: {0}")]
    GatewaySend(String),
}

pub type Result<T> = std::result::Result<T, NotifierError>;

impl From<NotifierError> for RustCareError {
    fn from(err: NotifierError) -> Self {
        match err {
            NotifierError::GatewaySend(msg) => RustCareError::internal(msg),
        }
    }
}
