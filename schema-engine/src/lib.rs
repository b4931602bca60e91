//! The form definition store: `Form -> FormVersion -> Section -> Question ->
//! Option`, versioning/activation, reordering, translations, and option CSV
//! import.
//!
//! ```
//! use schema_engine::{InMemoryFormRepository, NewForm, SchemaService};
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! # async fn run() {
//! let service = SchemaService::new(Arc::new(InMemoryFormRepository::new()));
//! let form = service
//!     .create_form(NewForm {
//!         title: "Intake".to_string(),
//!         slug: "intake".to_string(),
//!         created_by: Uuid::new_v4(),
//!         is_public: false,
//!         supported_languages: vec!["en".to_string()],
//!         default_language: "en".to_string(),
//!     })
//!     .await
//!     .unwrap();
//! # }
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{Result, SchemaError};
pub use models::*;
pub use repository::{FormRepository, InMemoryFormRepository};
pub use service::{NewForm, SchemaService};
