//! Identity: user registration, password and OTP login, tokens, lockout.
//!
//! Implements §4.1 of the platform spec: general users authenticate only by
//! OTP, employee users by password or OTP, lockout after 5 failed attempts
//! for 24h, and a 90-day password expiration.
//!
//! ```
//! use auth_identity::{IdentityConfig, IdentityService, InMemoryTokenBlocklist, InMemoryUserRepository};
//! use std::sync::Arc;
//!
//! # struct NoopSms;
//! # #[async_trait::async_trait]
//! # impl auth_identity::SmsGateway for NoopSms {
//! #     async fn send_otp(&self, _mobile: &str, _code: &str) -> auth_identity::Result<()> { Ok(()) }
//! # }
//! # async fn run() {
//! let service = IdentityService::new(
//!     Arc::new(InMemoryUserRepository::new()),
//!     Arc::new(InMemoryTokenBlocklist::new()),
//!     Arc::new(NoopSms),
//!     IdentityConfig::default(),
//! );
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use config::IdentityConfig;
pub use error::{IdentityError, Result};
pub use models::*;
pub use repository::{InMemoryTokenBlocklist, InMemoryUserRepository, SmsGateway, TokenBlocklist, UserRepository};
pub use service::IdentityService;
