//! services/api/src/adapters/db/categories.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ideaboard_core::domain::{Category, UpdateCategory};
use ideaboard_core::ports::{CategoryRepository, PortResult};
use sqlx::FromRow;
use uuid::Uuid;

use super::{not_found, unexpected, DbAdapter};

const CATEGORY_COLUMNS: &str = "id, user_id, name, color, created_at, updated_at";

#[derive(FromRow)]
struct CategoryRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    color: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CategoryRecord {
    fn to_domain(self) -> Category {
        Category {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            color: self.color,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[async_trait]
impl CategoryRepository for DbAdapter {
    async fn create_category(&self, user_id: Uuid, name: &str, color: &str) -> PortResult<Category> {
        let record = sqlx::query_as::<_, CategoryRecord>(&format!(
            "INSERT INTO categories (id, user_id, name, color) VALUES ($1, $2, $3, $4) \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(color)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_categories(&self, user_id: Uuid) -> PortResult<Vec<Category>> {
        let records = sqlx::query_as::<_, CategoryRecord>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE user_id = $1 \
             ORDER BY LOWER(name) COLLATE \"C\", name COLLATE \"C\", id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_category(&self, user_id: Uuid, id: Uuid) -> PortResult<Category> {
        let record = sqlx::query_as::<_, CategoryRecord>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Category", id))?;
        Ok(record.to_domain())
    }

    async fn update_category(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: UpdateCategory,
    ) -> PortResult<Category> {
        let record = sqlx::query_as::<_, CategoryRecord>(&format!(
            "UPDATE categories SET \
                 name = COALESCE($3, name), \
                 color = COALESCE($4, color), \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(patch.name)
        .bind(patch.color)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Category", id))?;
        Ok(record.to_domain())
    }

    async fn delete_category(&self, user_id: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(not_found("Category", id));
        }
        Ok(())
    }
}
