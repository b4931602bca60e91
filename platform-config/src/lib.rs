//! Environment-driven configuration for the forms platform.
//!
//! Each tunable subsystem owns its own `*Config` struct with a `Default`
//! matching the spec's stated constants; [`settings::load`] overlays
//! `{PREFIX}_*` environment variables on top of those defaults using the
//! `config` crate, the same source `auth-identity::IdentityConfig` expects
//! a caller to use for itself.
//!
//! ```
//! use platform_config::{WebhookConfig, load};
//!
//! let config: WebhookConfig = load("WEBHOOK").unwrap();
//! assert_eq!(config.worker_pool_size, 8);
//! ```

pub mod error;
pub mod settings;

pub use error::{ConfigError, Result};
pub use settings::{load, ValidatorConfig, WebhookConfig};
