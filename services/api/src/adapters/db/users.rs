//! services/api/src/adapters/db/users.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ideaboard_core::domain::{NewUser, UpdateProfile, User, UserCredentials};
use ideaboard_core::ports::{PortError, PortResult, UserRepository};
use sqlx::FromRow;
use uuid::Uuid;

use super::{not_found, unexpected, write_error, DbAdapter};

const USER_COLUMNS: &str = "id, username, phone, nickname, password_hash, created_at, updated_at";

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    phone: Option<String>,
    nickname: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRecord {
    fn into_credentials(self) -> UserCredentials {
        UserCredentials {
            password_hash: self.password_hash,
            user: User {
                id: self.id,
                username: self.username,
                phone: self.phone,
                nickname: self.nickname,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }

    fn to_domain(self) -> User {
        self.into_credentials().user
    }
}

#[async_trait]
impl UserRepository for DbAdapter {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, username, phone, nickname, password_hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.phone)
        .bind(&new_user.nickname)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "username or phone is already registered"))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("User", user_id))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User '{}' not found", username)))?;
        Ok(record.into_credentials())
    }

    async fn update_user_profile(&self, user_id: Uuid, patch: UpdateProfile) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET \
                 nickname = CASE WHEN $2 THEN $3 ELSE nickname END, \
                 phone = CASE WHEN $4 THEN $5 ELSE phone END, \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(patch.nickname.is_some())
        .bind(patch.nickname.flatten())
        .bind(patch.phone.is_some())
        .bind(patch.phone.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "phone is already registered"))?
        .ok_or_else(|| not_found("User", user_id))?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound("Auth session not found or expired".to_string()))
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn purge_expired_auth_sessions(&self) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected())
    }
}
