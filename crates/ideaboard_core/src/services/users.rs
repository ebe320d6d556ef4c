//! crates/ideaboard_core/src/services/users.rs
//!
//! Account management: signup, login, logout and the caller's own profile.
//! Passwords are stored as argon2 PHC strings; login sessions are opaque ids
//! persisted through the storage port and handed to the web layer as cookies.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::{AuthSession, LoginRequest, NewUser, SignupRequest, UpdateProfile, User};
use crate::ports::{DatabaseService, PortError, PortResult};
use crate::services::require_text;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct UsersService {
    db: Arc<dyn DatabaseService>,
    session_ttl: Duration,
}

impl UsersService {
    pub fn new(db: Arc<dyn DatabaseService>, session_ttl: Duration) -> Self {
        Self { db, session_ttl }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Creates the account and signs it in.
    pub async fn signup(&self, req: SignupRequest) -> PortResult<(User, AuthSession)> {
        let username = require_text("username", &req.username)?;
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PortError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| {
                error!("Failed to hash password: {:?}", e);
                PortError::Unexpected("failed to hash password".to_string())
            })?
            .to_string();

        let user = self
            .db
            .create_user(NewUser {
                username,
                phone: normalize_optional(req.phone),
                nickname: normalize_optional(req.nickname),
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, "user signed up");

        let session = self.open_session(user.id).await?;
        Ok((user, session))
    }

    /// Verifies credentials. Unknown usernames and wrong passwords are
    /// reported identically.
    pub async fn login(&self, req: LoginRequest) -> PortResult<(User, AuthSession)> {
        let credentials = match self.db.get_user_by_username(req.username.trim()).await {
            Ok(credentials) => credentials,
            Err(PortError::NotFound(_)) => return Err(PortError::Unauthorized),
            Err(e) => return Err(e),
        };

        let parsed_hash = PasswordHash::new(&credentials.password_hash).map_err(|e| {
            error!("Failed to parse password hash: {:?}", e);
            PortError::Unexpected("stored password hash is invalid".to_string())
        })?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| PortError::Unauthorized)?;

        let session = self.open_session(credentials.user.id).await?;
        info!(user_id = %credentials.user.id, "user logged in");
        Ok((credentials.user, session))
    }

    pub async fn logout(&self, session_id: &str) -> PortResult<()> {
        self.db.delete_auth_session(session_id).await
    }

    /// Resolves a session cookie to the signed-in user's id.
    pub async fn authenticate(&self, session_id: &str) -> PortResult<Uuid> {
        self.db
            .validate_auth_session(session_id)
            .await
            .map_err(|e| match e {
                PortError::NotFound(_) => PortError::Unauthorized,
                other => other,
            })
    }

    pub async fn me(&self, user_id: Uuid) -> PortResult<User> {
        self.db.get_user_by_id(user_id).await
    }

    pub async fn update_profile(&self, user_id: Uuid, mut patch: UpdateProfile) -> PortResult<User> {
        patch.nickname = patch.nickname.map(normalize_optional);
        patch.phone = patch.phone.map(normalize_optional);
        self.db.update_user_profile(user_id, patch).await
    }

    async fn open_session(&self, user_id: Uuid) -> PortResult<AuthSession> {
        let expires_at = Utc::now()
            .checked_add_signed(self.session_ttl)
            .ok_or_else(|| {
                PortError::Unexpected(format!(
                    "session lifetime of {} days is out of range",
                    self.session_ttl.num_days()
                ))
            })?;

        let purged = self.db.purge_expired_auth_sessions().await?;
        if purged > 0 {
            debug!(purged, "expired auth sessions removed");
        }

        let session = AuthSession {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at,
        };
        self.db
            .create_auth_session(&session.id, user_id, session.expires_at)
            .await?;
        Ok(session)
    }
}

/// Blank optional strings are stored as null.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
