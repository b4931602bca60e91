use error_common::RustCareError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(String),
    #[error("json error: {0}")]
    Json(String),
    #[error("archive error: {0}")]
    Archive(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

impl From<ExportError> for RustCareError {
    fn from(err: ExportError) -> Self {
        RustCareError::internal(err.to_string())
    }
}
