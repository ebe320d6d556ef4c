//! crates/ideaboard_core/src/services/canvases.rs

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Canvas, CanvasGraph, CreateCanvas, DataEnvelope, MessageEnvelope, UpdateCanvas};
use crate::ports::{DatabaseService, PortResult};
use crate::services::require_text;

pub const CANVAS_DELETED: &str = "画布已删除";

#[derive(Clone)]
pub struct CanvasesService {
    db: Arc<dyn DatabaseService>,
}

impl CanvasesService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: Uuid, dto: CreateCanvas) -> PortResult<Canvas> {
        let name = require_text("name", &dto.name)?;
        let canvas = self.db.create_canvas(user_id, &name).await?;
        info!(canvas_id = %canvas.id, %user_id, "canvas created");
        Ok(canvas)
    }

    pub async fn find_all(&self, user_id: Uuid) -> PortResult<DataEnvelope<Vec<Canvas>>> {
        Ok(DataEnvelope::new(self.db.list_canvases(user_id).await?))
    }

    pub async fn find_one(&self, user_id: Uuid, id: Uuid) -> PortResult<Canvas> {
        self.db.get_canvas(user_id, id).await
    }

    /// The canvas with all nodes and connections in one response.
    pub async fn find_graph(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> PortResult<DataEnvelope<CanvasGraph>> {
        Ok(DataEnvelope::new(self.db.get_canvas_graph(user_id, id).await?))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        dto: UpdateCanvas,
    ) -> PortResult<DataEnvelope<Canvas>> {
        let canvas = match dto.name {
            Some(name) => {
                let name = require_text("name", &name)?;
                self.db.rename_canvas(user_id, id, &name).await?
            }
            None => self.db.get_canvas(user_id, id).await?,
        };
        Ok(DataEnvelope::new(canvas))
    }

    pub async fn remove(&self, user_id: Uuid, id: Uuid) -> PortResult<MessageEnvelope> {
        self.db.delete_canvas(user_id, id).await?;
        info!(canvas_id = %id, %user_id, "canvas deleted");
        Ok(MessageEnvelope::new(CANVAS_DELETED))
    }
}
