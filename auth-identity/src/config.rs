use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub jwt_secret: String,
    /// §9: "JWT-style bearer tokens with short expiry (15m typical)".
    pub access_token_ttl_minutes: i64,
    pub password_min_length: usize,
    pub password_require_special_chars: bool,
    pub password_require_numbers: bool,
    pub password_require_uppercase: bool,
    /// §3: "lockout when failed_login_attempts >= 5 for 24h".
    pub max_login_attempts: u32,
    pub lockout_duration_hours: i64,
    /// §3: "password expiration 90d from set".
    pub password_expiration_days: i64,
    /// §4.1: "TTL 5 minutes" for a generated OTP.
    pub otp_ttl_minutes: i64,
    /// §4.1: "at 5 resends the account is locked".
    pub otp_resend_limit: u32,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            access_token_ttl_minutes: 15,
            password_min_length: 8,
            password_require_special_chars: true,
            password_require_numbers: true,
            password_require_uppercase: true,
            max_login_attempts: 5,
            lockout_duration_hours: 24,
            password_expiration_days: 90,
            otp_ttl_minutes: 5,
            otp_resend_limit: 5,
        }
    }
}
