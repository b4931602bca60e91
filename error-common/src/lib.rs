//! Shared error taxonomy for the forms platform.
//!
//! Every crate in this workspace owns its own `thiserror` enum for the
//! failures specific to it, then converts into [`RustCareError`] at its
//! boundary so a caller-supplied transport has one [`Kind`] to map to a
//! status code (§6/§7 of the platform spec) instead of one per crate.
//!
//! ```
//! use error_common::RustCareError;
//!
//! fn find_form(id: &str) -> Result<(), RustCareError> {
//!     if id.is_empty() {
//!         return Err(RustCareError::not_found("form not found"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod context;
pub mod codes;
pub mod reporting;

pub use context::*;
pub use types::*;
