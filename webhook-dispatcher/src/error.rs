use error_common::RustCareError;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("delivery request failed: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, WebhookError>;

impl From<WebhookError> for RustCareError {
    fn from(err: WebhookError) -> Self {
        RustCareError::internal(err.to_string())
    }
}
