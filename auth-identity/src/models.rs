use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// §3 DATA MODEL — User: general users authenticate by OTP only and carry
/// no `password_hash`; employee users authenticate by password or OTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub mobile: Option<String>,
    pub user_type: UserType,
    /// Never serialized out of the process; absent for `UserType::General`.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub password_expiration: Option<DateTime<Utc>>,
    /// Ordered set of roles: insertion order is preserved, not sorted.
    pub roles: Vec<Role>,
    pub failed_login_attempts: u32,
    pub otp_resend_count: u32,
    pub lock_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    pub otp_expiration: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.is_some_and(|until| now < until)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Superadmin) || self.has_role(Role::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Employee,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superadmin,
    Admin,
    Creator,
    Editor,
    Publisher,
    Deo,
    User,
    General,
}

/// The field an identifier in a login/register request was matched against;
/// `identifier` may match any of {email, username, employee_id} per §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierField {
    Username,
    Email,
    EmployeeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub mobile: Option<String>,
    pub password: Option<String>,
    pub user_type: UserType,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone)]
pub enum Credential {
    Password(String),
    Otp(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user id.
    pub sub: Uuid,
    /// JWT id, used as the blocklist key on logout.
    pub jti: Uuid,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}
