use crate::error::*;
use crate::models::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: User) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    /// Matches against any of {username, email, employee_id} per §4.1.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>>;
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>>;
    async fn update_user(&self, user: User) -> Result<User>;
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}

/// §9: "the token blocklist ... must be injectable so tests can substitute
/// instances". Keyed by JWT id (`jti`), not by the raw token string, so a
/// blocklisted token never needs to be retained past its own expiry.
#[async_trait]
pub trait TokenBlocklist: Send + Sync {
    async fn blocklist(&self, jti: Uuid, expires_at: DateTime<Utc>);
    async fn is_blocklisted(&self, jti: Uuid) -> bool;
}

/// §4.1: `GenerateOTP` sends a 6-digit code via `SMSGateway.send_otp`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send_otp(&self, mobile: &str, code: &str) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: User) -> Result<User> {
        let mut users = self.users.lock().await;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|u| {
                u.username.as_deref() == Some(identifier)
                    || u.email.as_deref() == Some(identifier)
                    || u.employee_id.as_deref() == Some(identifier)
            })
            .cloned())
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|u| u.mobile.as_deref() == Some(mobile))
            .cloned())
    }

    async fn update_user(&self, user: User) -> Result<User> {
        let mut users = self.users.lock().await;
        if !users.contains_key(&user.id) {
            return Err(IdentityError::UserNotFound);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.lock().await;
        users.remove(&id).ok_or(IdentityError::UserNotFound)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTokenBlocklist {
    entries: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl InMemoryTokenBlocklist {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenBlocklist for InMemoryTokenBlocklist {
    async fn blocklist(&self, jti: Uuid, expires_at: DateTime<Utc>) {
        self.entries.lock().await.insert(jti, expires_at);
    }

    async fn is_blocklisted(&self, jti: Uuid) -> bool {
        let mut entries = self.entries.lock().await;
        if let Some(expires_at) = entries.get(&jti).copied() {
            if expires_at < Utc::now() {
                entries.remove(&jti);
                return false;
            }
            return true;
        }
        false
    }
}
