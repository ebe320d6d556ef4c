//! crates/ideaboard_core/src/services/ideas.rs

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{CreateIdea, DataEnvelope, Idea, MessageEnvelope, UpdateIdea};
use crate::ports::{DatabaseService, PortResult};
use crate::services::require_text;

pub const IDEA_DELETED: &str = "想法已删除";

#[derive(Clone)]
pub struct IdeasService {
    db: Arc<dyn DatabaseService>,
}

impl IdeasService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: Uuid, dto: CreateIdea) -> PortResult<Idea> {
        let content = require_text("content", &dto.content)?;
        let idea = self.db.create_idea(user_id, &content, dto.source).await?;
        info!(idea_id = %idea.id, %user_id, "idea created");
        Ok(idea)
    }

    pub async fn find_all(&self, user_id: Uuid) -> PortResult<DataEnvelope<Vec<Idea>>> {
        Ok(DataEnvelope::new(self.db.list_ideas(user_id).await?))
    }

    pub async fn find_one(&self, user_id: Uuid, id: Uuid) -> PortResult<Idea> {
        self.db.get_idea(user_id, id).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        mut dto: UpdateIdea,
    ) -> PortResult<DataEnvelope<Idea>> {
        if let Some(content) = dto.content.as_deref() {
            dto.content = Some(require_text("content", content)?);
        }
        Ok(DataEnvelope::new(self.db.update_idea(user_id, id, dto).await?))
    }

    pub async fn remove(&self, user_id: Uuid, id: Uuid) -> PortResult<MessageEnvelope> {
        self.db.delete_idea(user_id, id).await?;
        info!(idea_id = %id, %user_id, "idea deleted");
        Ok(MessageEnvelope::new(IDEA_DELETED))
    }
}
