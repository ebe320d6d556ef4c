//! crates/ideaboard_core/src/services/tasks.rs

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{CreateTask, DataEnvelope, MessageEnvelope, Task, UpdateTask};
use crate::ports::{DatabaseService, PortResult};
use crate::services::require_text;

pub const TASK_DELETED: &str = "任务已删除";

#[derive(Clone)]
pub struct TasksService {
    db: Arc<dyn DatabaseService>,
}

impl TasksService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: Uuid, mut dto: CreateTask) -> PortResult<Task> {
        dto.title = require_text("title", &dto.title)?;
        let task = self.db.create_task(user_id, dto).await?;
        info!(task_id = %task.id, %user_id, "task created");
        Ok(task)
    }

    pub async fn find_all(&self, user_id: Uuid) -> PortResult<DataEnvelope<Vec<Task>>> {
        Ok(DataEnvelope::new(self.db.list_tasks(user_id).await?))
    }

    pub async fn find_one(&self, user_id: Uuid, id: Uuid) -> PortResult<Task> {
        self.db.get_task(user_id, id).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        mut dto: UpdateTask,
    ) -> PortResult<DataEnvelope<Task>> {
        if let Some(title) = dto.title.as_deref() {
            dto.title = Some(require_text("title", title)?);
        }
        Ok(DataEnvelope::new(self.db.update_task(user_id, id, dto).await?))
    }

    pub async fn remove(&self, user_id: Uuid, id: Uuid) -> PortResult<MessageEnvelope> {
        self.db.delete_task(user_id, id).await?;
        info!(task_id = %id, %user_id, "task deleted");
        Ok(MessageEnvelope::new(TASK_DELETED))
    }
}
