use error_common::RustCareError;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    InvalidCondition(#[from] expr_eval::ExprError),
    #[error(transparent)]
    Store(#[from] response_store::ResponseStoreError),
    #[error(transparent)]
    Schema(#[from] schema_engine::SchemaError),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

impl From<WorkflowError> for RustCareError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidCondition(e) => e.into(),
            WorkflowError::Store(e) => e.into(),
            WorkflowError::Schema(e) => e.into(),
        }
    }
}
