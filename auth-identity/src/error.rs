use error_common::{AuthReason, ConflictReason, Kind, RustCareError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identifier already in use: {0}")]
    DuplicateIdentifier(&'static str),

    #[error("password does not meet the configured policy")]
    WeakPassword,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account locked until {retry_after_secs}s from now")]
    AccountLocked { retry_after_secs: u64 },

    #[error("password has expired")]
    PasswordExpired,

    #[error("otp has expired")]
    OtpExpired,

    #[error("token is invalid")]
    TokenInvalid,

    #[error("token has been blocklisted")]
    TokenBlocklisted,

    #[error("user not found")]
    UserNotFound,

    #[error("general users may only authenticate via otp")]
    GeneralUserRequiresOtp,

    #[error("password hashing failed")]
    HashingError,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, IdentityError>;

impl From<IdentityError> for RustCareError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::DuplicateIdentifier(field) => {
                RustCareError::new(Kind::Conflict(ConflictReason::DuplicateIdentifier), field)
            }
            IdentityError::WeakPassword => {
                RustCareError::new(Kind::Validation, err.to_string())
            }
            IdentityError::InvalidCredentials | IdentityError::GeneralUserRequiresOtp => {
                RustCareError::new(Kind::Auth(AuthReason::InvalidCredentials), err.to_string())
            }
            IdentityError::AccountLocked { retry_after_secs } => {
                RustCareError::account_locked(retry_after_secs)
            }
            IdentityError::PasswordExpired => {
                RustCareError::new(Kind::Auth(AuthReason::PasswordExpired), err.to_string())
            }
            IdentityError::OtpExpired => {
                RustCareError::new(Kind::Auth(AuthReason::InvalidCredentials), err.to_string())
            }
            IdentityError::TokenInvalid => {
                RustCareError::new(Kind::Auth(AuthReason::TokenInvalid), err.to_string())
            }
            IdentityError::TokenBlocklisted => {
                RustCareError::new(Kind::Auth(AuthReason::TokenBlocklisted), err.to_string())
            }
            IdentityError::UserNotFound => RustCareError::not_found(err.to_string()),
            IdentityError::HashingError | IdentityError::Internal(_) => {
                RustCareError::internal(err.to_string())
            }
        }
    }
}
