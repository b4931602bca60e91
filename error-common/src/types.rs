use crate::context::ErrorContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Error kind taxonomy shared across every crate in this workspace.
///
/// A caller-supplied HTTP layer (or any other transport) maps a `Kind` to a
/// status code via [`Kind::http_status`] without any crate here depending on
/// an HTTP type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Bad credentials, locked account, expired password, invalid/blocklisted token.
    Auth(AuthReason),
    /// Caller authenticated but lacks permission for the action.
    PermissionDenied,
    /// Referenced entity does not exist (or is soft-deleted and excluded).
    NotFound,
    /// Unique-constraint violation (slug, version, identifier).
    Conflict(ConflictReason),
    /// Field-shape or submission-field validation failure.
    Validation,
    /// A workflow/required-condition expression fails the parse-time whitelist.
    InvalidCondition,
    /// Action is disallowed given current entity state (draft submit, expired, private).
    StateError,
    /// Anything else — bugs, I/O, unexpected invariant breaks.
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthReason {
    InvalidCredentials,
    AccountLocked,
    PasswordExpired,
    TokenInvalid,
    TokenBlocklisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictReason {
    DuplicateSlug,
    DuplicateVersion,
    DuplicateIdentifier,
}

impl Kind {
    /// §6's status-code mapping table.
    pub fn http_status(&self) -> u16 {
        match self {
            Kind::Auth(AuthReason::AccountLocked) => 403,
            Kind::Auth(_) => 401,
            Kind::PermissionDenied | Kind::StateError => 403,
            Kind::NotFound => 404,
            Kind::Conflict(_) => 409,
            Kind::Validation => 422,
            Kind::InvalidCondition => 400,
            Kind::Internal => 500,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Auth(reason) => write!(f, "Auth({reason:?})"),
            Kind::PermissionDenied => write!(f, "PermissionDenied"),
            Kind::NotFound => write!(f, "NotFound"),
            Kind::Conflict(reason) => write!(f, "Conflict({reason:?})"),
            Kind::Validation => write!(f, "Validation"),
            Kind::InvalidCondition => write!(f, "InvalidCondition"),
            Kind::StateError => write!(f, "StateError"),
            Kind::Internal => write!(f, "Internal"),
        }
    }
}

/// A single field-level validation failure, as referenced by §4.4/§6's 422 body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub kind: String,
    pub message: String,
}

/// The error type every crate in this workspace converts into at its boundary.
#[derive(Error, Debug, Serialize, Deserialize)]
pub struct RustCareError {
    pub kind: Kind,
    pub message: String,
    /// Populated for `Kind::Validation`; empty otherwise.
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
    /// Populated for `Kind::Auth(AuthReason::AccountLocked)` per §7.
    #[serde(default)]
    pub retry_after_secs: Option<u64>,
    pub context: ErrorContext,
    pub error_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// True when `message`/`context` may contain submission data or PII and
    /// must be stripped before crossing a trust boundary (see [`Self::sanitized`]).
    pub is_sensitive: bool,
}

impl RustCareError {
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: Vec::new(),
            retry_after_secs: None,
            context: ErrorContext::new(),
            error_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            is_sensitive: false,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Kind::NotFound, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(Kind::PermissionDenied, message)
    }

    pub fn state_error(message: impl Into<String>) -> Self {
        Self::new(Kind::StateError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Kind::Internal, message).sensitive()
    }

    pub fn validation(field_errors: Vec<FieldError>) -> Self {
        Self {
            message: "submission failed validation".to_string(),
            field_errors,
            ..Self::new(Kind::Validation, "validation failed")
        }
    }

    pub fn account_locked(retry_after_secs: u64) -> Self {
        Self {
            retry_after_secs: Some(retry_after_secs),
            ..Self::new(Kind::Auth(AuthReason::AccountLocked), "account locked")
        }
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.is_sensitive = true;
        self
    }

    /// Strip message/context/field detail that may carry PII before the
    /// error crosses an external boundary (logs, webhooks, client response).
    pub fn sanitized(&self) -> RustCareError {
        let mut sanitized = RustCareError {
            kind: self.kind,
            message: self.message.clone(),
            field_errors: self.field_errors.clone(),
            retry_after_secs: self.retry_after_secs,
            context: self.context.clone(),
            error_id: self.error_id,
            timestamp: self.timestamp,
            is_sensitive: self.is_sensitive,
        };
        if self.is_sensitive {
            sanitized.message = "an internal error occurred".to_string();
            sanitized.context = ErrorContext::new();
        }
        sanitized
    }
}

impl fmt::Display for RustCareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (id {})", self.kind, self.message, self.error_id)
    }
}

pub type RustCareResult<T> = Result<T, RustCareError>;
