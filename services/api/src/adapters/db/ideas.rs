//! services/api/src/adapters/db/ideas.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ideaboard_core::domain::{Idea, UpdateIdea};
use ideaboard_core::ports::{IdeaRepository, PortResult};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

use super::{not_found, unexpected, DbAdapter};

const IDEA_COLUMNS: &str = "id, user_id, content, source, deleted_at, created_at, updated_at";

#[derive(FromRow)]
struct IdeaRecord {
    id: Uuid,
    user_id: Uuid,
    content: String,
    source: Option<JsonValue>,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdeaRecord {
    fn to_domain(self) -> Idea {
        Idea {
            id: self.id,
            user_id: self.user_id,
            content: self.content,
            source: self.source,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[async_trait]
impl IdeaRepository for DbAdapter {
    async fn create_idea(
        &self,
        user_id: Uuid,
        content: &str,
        source: Option<JsonValue>,
    ) -> PortResult<Idea> {
        let record = sqlx::query_as::<_, IdeaRecord>(&format!(
            "INSERT INTO ideas (id, user_id, content, source) VALUES ($1, $2, $3, $4) \
             RETURNING {IDEA_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(content)
        .bind(source)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_ideas(&self, user_id: Uuid) -> PortResult<Vec<Idea>> {
        let records = sqlx::query_as::<_, IdeaRecord>(&format!(
            "SELECT {IDEA_COLUMNS} FROM ideas WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_idea(&self, user_id: Uuid, id: Uuid) -> PortResult<Idea> {
        let record = sqlx::query_as::<_, IdeaRecord>(&format!(
            "SELECT {IDEA_COLUMNS} FROM ideas WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Idea", id))?;
        Ok(record.to_domain())
    }

    async fn update_idea(&self, user_id: Uuid, id: Uuid, patch: UpdateIdea) -> PortResult<Idea> {
        let record = sqlx::query_as::<_, IdeaRecord>(&format!(
            "UPDATE ideas SET \
                 content = COALESCE($3, content), \
                 source = CASE WHEN $4 THEN $5 ELSE source END, \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {IDEA_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(patch.content)
        .bind(patch.source.is_some())
        .bind(patch.source.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Idea", id))?;
        Ok(record.to_domain())
    }

    async fn delete_idea(&self, user_id: Uuid, id: Uuid) -> PortResult<()> {
        // Linked tasks and canvas nodes are unlinked by ON DELETE SET NULL.
        let result = sqlx::query("DELETE FROM ideas WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(not_found("Idea", id));
        }
        Ok(())
    }
}
