//! Submission storage (§4.5, §4.7): the `FormResponse` repository/service
//! split, append-only `ResponseHistory`, cursor search, and the approval
//! state machine (`pending -> {approved, rejected}`, both reopenable).

pub mod error;
pub mod filter;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{ResponseStoreError, Result};
pub use models::*;
pub use repository::{InMemoryResponseRepository, ResponseRepository};
pub use service::{ResponseStoreService, SubmitRequest};
