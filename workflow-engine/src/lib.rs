//! Post-submission workflow engine (§4.8): binds a `FormWorkflow` to a
//! trigger form, evaluates `trigger_condition` against the flat-answers
//! context in creation order, and runs the first match's actions
//! (`redirect_to_form`, `create_draft`, `notify_user`).

pub mod engine;
pub mod error;
pub mod mapping;
pub mod models;
pub mod repository;

pub use engine::{WorkflowActionOutcome, WorkflowEngine, WorkflowNotifier};
pub use error::{Result, WorkflowError};
pub use mapping::resolve_data_mapping;
pub use models::{FormWorkflow, WorkflowAction, WorkflowActionType};
pub use repository::{InMemoryWorkflowRepository, WorkflowRepository};
