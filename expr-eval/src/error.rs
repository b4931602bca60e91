use error_common::{Kind, RustCareError};

#[derive(Debug, thiserror::Error)]
pub enum ExprError {
    #[error("unexpected end of expression")]
    UnexpectedEof,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("node outside the approved grammar: {0}")]
    DisallowedNode(String),
    #[error("type error: {0}")]
    Type(String),
}

pub type Result<T> = std::result::Result<T, ExprError>;

impl From<ExprError> for RustCareError {
    fn from(err: ExprError) -> Self {
        match &err {
            ExprError::Type(_) => RustCareError::new(Kind::Internal, err.to_string()),
            _ => RustCareError::new(Kind::InvalidCondition, err.to_string()),
        }
    }
}
