use crate::{config::*, error::*, models::*, repository::*};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jwt::{SignWithKey, VerifyWithKey};
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;
use uuid::Uuid;

pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    blocklist: Arc<dyn TokenBlocklist>,
    sms: Arc<dyn SmsGateway>,
    config: IdentityConfig,
    argon2: Argon2<'static>,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        blocklist: Arc<dyn TokenBlocklist>,
        sms: Arc<dyn SmsGateway>,
        config: IdentityConfig,
    ) -> Self {
        Self {
            users,
            blocklist,
            sms,
            config,
            argon2: Argon2::default(),
        }
    }

    /// §4.1 `Register`.
    pub async fn register_user(&self, request: RegisterRequest) -> Result<User> {
        if matches!(request.user_type, UserType::General) && request.password.is_some() {
            return Err(IdentityError::GeneralUserRequiresOtp);
        }

        if let Some(ref username) = request.username {
            if self.users.find_by_identifier(username).await?.is_some() {
                return Err(IdentityError::DuplicateIdentifier("username"));
            }
        }
        if let Some(ref email) = request.email {
            if self.users.find_by_identifier(email).await?.is_some() {
                return Err(IdentityError::DuplicateIdentifier("email"));
            }
        }
        if let Some(ref employee_id) = request.employee_id {
            if self.users.find_by_identifier(employee_id).await?.is_some() {
                return Err(IdentityError::DuplicateIdentifier("employee_id"));
            }
        }
        if let Some(ref mobile) = request.mobile {
            if self.users.find_by_mobile(mobile).await?.is_some() {
                return Err(IdentityError::DuplicateIdentifier("mobile"));
            }
        }

        let (password_hash, password_expiration) = match &request.password {
            Some(password) => {
                self.validate_password(password)?;
                (
                    Some(self.hash_password(password)?),
                    Some(Utc::now() + Duration::days(self.config.password_expiration_days)),
                )
            }
            None => (None, None),
        };

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: request.username,
            email: request.email,
            employee_id: request.employee_id,
            mobile: request.mobile,
            user_type: request.user_type,
            password_hash,
            password_expiration,
            roles: request.roles,
            failed_login_attempts: 0,
            otp_resend_count: 0,
            lock_until: None,
            otp: None,
            otp_expiration: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        self.users.create_user(user).await
    }

    /// §4.1 `Login`. `identifier` matches {email, username, employee_id} for
    /// password credentials and {mobile} for OTP credentials.
    pub async fn login(&self, identifier: &str, credential: Credential) -> Result<LoginResponse> {
        let user = match &credential {
            Credential::Password(_) => self.users.find_by_identifier(identifier).await?,
            Credential::Otp(_) => self.users.find_by_mobile(identifier).await?,
        }
        .ok_or(IdentityError::InvalidCredentials)?;

        let now = Utc::now();
        if user.is_locked(now) {
            let retry_after_secs = (user.lock_until.unwrap_or(now) - now).num_seconds().max(0) as u64;
            return Err(IdentityError::AccountLocked { retry_after_secs });
        }

        if matches!(credential, Credential::Password(_)) && matches!(user.user_type, UserType::General) {
            return Err(IdentityError::GeneralUserRequiresOtp);
        }

        let verified = match &credential {
            Credential::Password(password) => self.verify_password_credential(&user, password),
            Credential::Otp(code) => self.verify_otp_credential(&user, code, now),
        };
        if let Err(err) = verified {
            self.record_failed_attempt(user.clone(), now).await?;
            return Err(err);
        }

        if let Credential::Password(_) = &credential {
            if let Some(expiration) = user.password_expiration {
                if now > expiration {
                    return Err(IdentityError::PasswordExpired);
                }
            }
        }

        let mut user = user;
        user.failed_login_attempts = 0;
        user.otp_resend_count = 0;
        user.lock_until = None;
        user.otp = None;
        user.otp_expiration = None;
        user.last_login = Some(now);
        user.updated_at = now;
        let user = self.users.update_user(user).await?;

        let (access_token, expires_at) = self.issue_token(user.id)?;
        Ok(LoginResponse {
            access_token,
            expires_at,
            user,
        })
    }

    /// §4.1 `GenerateOTP`.
    pub async fn generate_otp(&self, mobile: &str) -> Result<()> {
        let mut user = self
            .users
            .find_by_mobile(mobile)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        user.otp_resend_count += 1;
        if user.otp_resend_count >= self.config.otp_resend_limit {
            user.lock_until = Some(Utc::now() + Duration::hours(self.config.lockout_duration_hours));
            self.users.update_user(user).await?;
            return Err(IdentityError::AccountLocked {
                retry_after_secs: (self.config.lockout_duration_hours * 3600) as u64,
            });
        }

        let code = Self::generate_otp_code();
        user.otp = Some(code.clone());
        user.otp_expiration = Some(Utc::now() + Duration::minutes(self.config.otp_ttl_minutes));
        user.updated_at = Utc::now();
        self.users.update_user(user).await?;

        self.sms.send_otp(mobile, &code).await
    }

    /// §4.1 `Logout` — blocklists the token's `jti` until its own expiry.
    pub async fn logout(&self, token: &str) -> Result<()> {
        let claims = self.decode_token(token)?;
        self.blocklist.blocklist(claims.jti, unix_secs_to_datetime(claims.exp)).await;
        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<User> {
        let claims = self.decode_token(token)?;

        if self.blocklist.is_blocklisted(claims.jti).await {
            return Err(IdentityError::TokenBlocklisted);
        }
        if unix_secs_to_datetime(claims.exp) < Utc::now() {
            return Err(IdentityError::TokenInvalid);
        }

        self.users
            .find_by_id(claims.sub)
            .await?
            .ok_or(IdentityError::UserNotFound)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        self.verify_password_credential(&user, old_password)?;
        self.validate_password(new_password)?;

        user.password_hash = Some(self.hash_password(new_password)?);
        user.password_expiration = Some(Utc::now() + Duration::days(self.config.password_expiration_days));
        user.updated_at = Utc::now();
        self.users.update_user(user).await?;
        Ok(())
    }

    async fn record_failed_attempt(&self, mut user: User, now: chrono::DateTime<Utc>) -> Result<()> {
        user.failed_login_attempts += 1;
        if user.failed_login_attempts >= self.config.max_login_attempts {
            user.lock_until = Some(now + Duration::hours(self.config.lockout_duration_hours));
        }
        user.updated_at = now;
        self.users.update_user(user).await?;
        Ok(())
    }

    fn verify_password_credential(&self, user: &User, password: &str) -> Result<()> {
        let hash = user.password_hash.as_deref().ok_or(IdentityError::InvalidCredentials)?;
        let parsed_hash = PasswordHash::new(hash).map_err(|_| IdentityError::HashingError)?;
        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| IdentityError::InvalidCredentials)
    }

    fn verify_otp_credential(&self, user: &User, code: &str, now: chrono::DateTime<Utc>) -> Result<()> {
        let expiration = user.otp_expiration.ok_or(IdentityError::InvalidCredentials)?;
        if now > expiration {
            return Err(IdentityError::OtpExpired);
        }
        if user.otp.as_deref() == Some(code) {
            Ok(())
        } else {
            Err(IdentityError::InvalidCredentials)
        }
    }

    fn validate_password(&self, password: &str) -> Result<()> {
        if password.len() < self.config.password_min_length {
            return Err(IdentityError::WeakPassword);
        }
        if self.config.password_require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err(IdentityError::WeakPassword);
        }
        if self.config.password_require_numbers && !password.chars().any(|c| c.is_numeric()) {
            return Err(IdentityError::WeakPassword);
        }
        if self.config.password_require_special_chars
            && !password.chars().any(|c| !c.is_alphanumeric())
        {
            return Err(IdentityError::WeakPassword);
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| IdentityError::HashingError)
    }

    fn issue_token(&self, user_id: Uuid) -> Result<(String, chrono::DateTime<Utc>)> {
        let expires_at = Utc::now() + Duration::minutes(self.config.access_token_ttl_minutes);
        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4(),
            exp: expires_at.timestamp(),
        };
        let key: Hmac<Sha256> = Hmac::new_from_slice(self.config.jwt_secret.as_bytes())
            .map_err(|e| IdentityError::Internal(e.into()))?;
        let token = claims
            .sign_with_key(&key)
            .map_err(|e| IdentityError::Internal(e.into()))?;
        Ok((token, expires_at))
    }

    fn decode_token(&self, token: &str) -> Result<Claims> {
        let key: Hmac<Sha256> = Hmac::new_from_slice(self.config.jwt_secret.as_bytes())
            .map_err(|e| IdentityError::Internal(e.into()))?;
        token
            .verify_with_key(&key)
            .map_err(|_| IdentityError::TokenInvalid)
    }

    fn generate_otp_code() -> String {
        format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
    }
}

fn unix_secs_to_datetime(secs: i64) -> chrono::DateTime<Utc> {
    chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}
