//! services/api/src/adapters/db/tasks.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ideaboard_core::domain::{CreateTask, Task, TaskStatus, UpdateTask};
use ideaboard_core::ports::{PortError, PortResult, TaskRepository};
use sqlx::FromRow;
use uuid::Uuid;

use super::{not_found, require_idea, unexpected, DbAdapter};

const TASK_COLUMNS: &str = "id, user_id, idea_id, title, description, status, category, \
                            due_date, deleted_at, created_at, updated_at";

#[derive(FromRow)]
struct TaskRecord {
    id: Uuid,
    user_id: Uuid,
    idea_id: Option<Uuid>,
    title: String,
    description: Option<String>,
    status: String,
    category: Option<String>,
    due_date: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRecord {
    fn to_domain(self) -> PortResult<Task> {
        let status = self
            .status
            .parse::<TaskStatus>()
            .map_err(PortError::Unexpected)?;
        Ok(Task {
            id: self.id,
            user_id: self.user_id,
            idea_id: self.idea_id,
            title: self.title,
            description: self.description,
            status,
            category: self.category,
            due_date: self.due_date,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl TaskRepository for DbAdapter {
    async fn create_task(&self, user_id: Uuid, dto: CreateTask) -> PortResult<Task> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        if let Some(idea_id) = dto.idea_id {
            require_idea(&mut *tx, user_id, idea_id).await?;
        }
        let record = sqlx::query_as::<_, TaskRecord>(&format!(
            "INSERT INTO tasks (id, user_id, idea_id, title, description, status, category, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {TASK_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(dto.idea_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.status.as_str())
        .bind(&dto.category)
        .bind(dto.due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn list_tasks(&self, user_id: Uuid) -> PortResult<Vec<Task>> {
        let records = sqlx::query_as::<_, TaskRecord>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_task(&self, user_id: Uuid, id: Uuid) -> PortResult<Task> {
        sqlx::query_as::<_, TaskRecord>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Task", id))?
        .to_domain()
    }

    async fn update_task(&self, user_id: Uuid, id: Uuid, patch: UpdateTask) -> PortResult<Task> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        if let Some(Some(idea_id)) = patch.idea_id {
            require_idea(&mut *tx, user_id, idea_id).await?;
        }
        let record = sqlx::query_as::<_, TaskRecord>(&format!(
            "UPDATE tasks SET \
                 title = COALESCE($3, title), \
                 description = CASE WHEN $4 THEN $5 ELSE description END, \
                 status = COALESCE($6, status), \
                 category = CASE WHEN $7 THEN $8 ELSE category END, \
                 due_date = CASE WHEN $9 THEN $10 ELSE due_date END, \
                 idea_id = CASE WHEN $11 THEN $12 ELSE idea_id END, \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(patch.title)
        .bind(patch.description.is_some())
        .bind(patch.description.flatten())
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.category.is_some())
        .bind(patch.category.flatten())
        .bind(patch.due_date.is_some())
        .bind(patch.due_date.flatten())
        .bind(patch.idea_id.is_some())
        .bind(patch.idea_id.flatten())
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Task", id))?;
        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn delete_task(&self, user_id: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(not_found("Task", id));
        }
        Ok(())
    }
}
