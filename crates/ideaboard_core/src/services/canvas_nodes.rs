//! crates/ideaboard_core/src/services/canvas_nodes.rs
//!
//! Nodes are owned through their canvas, so every call is scoped by both the
//! calling user and the canvas id taken from the route.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{CanvasNode, CreateCanvasNode, DataEnvelope, MessageEnvelope, UpdateCanvasNode};
use crate::ports::{DatabaseService, PortError, PortResult};

pub const NODE_DELETED: &str = "节点已删除";

#[derive(Clone)]
pub struct CanvasNodesService {
    db: Arc<dyn DatabaseService>,
}

impl CanvasNodesService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        dto: CreateCanvasNode,
    ) -> PortResult<CanvasNode> {
        validate_position(dto.x, dto.y)?;
        validate_size(dto.width, dto.height)?;
        let node = self.db.create_node(user_id, canvas_id, dto).await?;
        info!(node_id = %node.id, %canvas_id, "canvas node created");
        Ok(node)
    }

    pub async fn find_all(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
    ) -> PortResult<DataEnvelope<Vec<CanvasNode>>> {
        Ok(DataEnvelope::new(self.db.list_nodes(user_id, canvas_id).await?))
    }

    pub async fn find_one(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<CanvasNode> {
        self.db.get_node(user_id, canvas_id, id).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
        dto: UpdateCanvasNode,
    ) -> PortResult<DataEnvelope<CanvasNode>> {
        validate_position(dto.x.unwrap_or(0.0), dto.y.unwrap_or(0.0))?;
        validate_size(dto.width.unwrap_or(1.0), dto.height.unwrap_or(1.0))?;
        let node = self.db.update_node(user_id, canvas_id, id, dto).await?;
        Ok(DataEnvelope::new(node))
    }

    pub async fn remove(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<MessageEnvelope> {
        self.db.delete_node(user_id, canvas_id, id).await?;
        info!(node_id = %id, %canvas_id, "canvas node deleted");
        Ok(MessageEnvelope::new(NODE_DELETED))
    }
}

fn validate_position(x: f64, y: f64) -> PortResult<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(PortError::InvalidInput("node position must be finite".to_string()))
    }
}

fn validate_size(width: f64, height: f64) -> PortResult<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(PortError::InvalidInput(
            "node width and height must be positive".to_string(),
        ))
    }
}
