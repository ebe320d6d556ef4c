//! crates/ideaboard_core/src/services/canvas_connections.rs

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    CanvasConnection, CreateCanvasConnection, DataEnvelope, MessageEnvelope,
    UpdateCanvasConnection,
};
use crate::ports::{DatabaseService, PortError, PortResult};

pub const CONNECTION_DELETED: &str = "连线已删除";

#[derive(Clone)]
pub struct CanvasConnectionsService {
    db: Arc<dyn DatabaseService>,
}

impl CanvasConnectionsService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        dto: CreateCanvasConnection,
    ) -> PortResult<CanvasConnection> {
        if dto.from_node_id == dto.to_node_id {
            return Err(PortError::InvalidInput(
                "a connection cannot start and end on the same node".to_string(),
            ));
        }
        let connection = self.db.create_connection(user_id, canvas_id, dto).await?;
        info!(connection_id = %connection.id, %canvas_id, "canvas connection created");
        Ok(connection)
    }

    pub async fn find_all(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
    ) -> PortResult<DataEnvelope<Vec<CanvasConnection>>> {
        Ok(DataEnvelope::new(
            self.db.list_connections(user_id, canvas_id).await?,
        ))
    }

    pub async fn find_one(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
    ) -> PortResult<CanvasConnection> {
        self.db.get_connection(user_id, canvas_id, id).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
        dto: UpdateCanvasConnection,
    ) -> PortResult<DataEnvelope<CanvasConnection>> {
        let connection = self
            .db
            .update_connection(user_id, canvas_id, id, dto)
            .await?;
        Ok(DataEnvelope::new(connection))
    }

    pub async fn remove(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
    ) -> PortResult<MessageEnvelope> {
        self.db.delete_connection(user_id, canvas_id, id).await?;
        info!(connection_id = %id, %canvas_id, "canvas connection deleted");
        Ok(MessageEnvelope::new(CONNECTION_DELETED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateCanvas, CreateCanvasNode};
    use crate::memory::InMemoryDatabase;
    use crate::services::{CanvasNodesService, CanvasesService};

    struct Board {
        canvas_id: Uuid,
        a: Uuid,
        b: Uuid,
    }

    async fn board(db: &Arc<InMemoryDatabase>, user: Uuid) -> Board {
        let canvas = CanvasesService::new(db.clone())
            .create(user, CreateCanvas { name: "Flow".into() })
            .await
            .unwrap();
        let nodes = CanvasNodesService::new(db.clone());
        let mut ids = Vec::new();
        for x in [0.0, 150.0] {
            let node = nodes
                .create(
                    user,
                    canvas.id,
                    CreateCanvasNode {
                        x,
                        y: 0.0,
                        width: 100.0,
                        height: 40.0,
                        content: None,
                        idea_id: None,
                    },
                )
                .await
                .unwrap();
            ids.push(node.id);
        }
        Board {
            canvas_id: canvas.id,
            a: ids[0],
            b: ids[1],
        }
    }

    fn edge(from: Uuid, to: Uuid) -> CreateCanvasConnection {
        CreateCanvasConnection {
            from_node_id: from,
            to_node_id: to,
            label: None,
        }
    }

    #[tokio::test]
    async fn connects_nodes_and_relabels() {
        let db = Arc::new(InMemoryDatabase::new());
        let svc = CanvasConnectionsService::new(db.clone());
        let user = Uuid::new_v4();
        let board = board(&db, user).await;

        let conn = svc
            .create(user, board.canvas_id, edge(board.a, board.b))
            .await
            .unwrap();
        assert_eq!(conn.from_node_id, board.a);
        assert_eq!(conn.to_node_id, board.b);

        let relabeled = svc
            .update(
                user,
                board.canvas_id,
                conn.id,
                UpdateCanvasConnection {
                    label: Some(Some("causes".into())),
                },
            )
            .await
            .unwrap()
            .data;
        assert_eq!(relabeled.label.as_deref(), Some("causes"));
    }

    #[tokio::test]
    async fn rejects_self_loops_and_nodes_from_other_canvases() {
        let db = Arc::new(InMemoryDatabase::new());
        let svc = CanvasConnectionsService::new(db.clone());
        let user = Uuid::new_v4();
        let first = board(&db, user).await;
        let second = board(&db, user).await;

        assert!(matches!(
            svc.create(user, first.canvas_id, edge(first.a, first.a)).await,
            Err(PortError::InvalidInput(_))
        ));
        assert!(matches!(
            svc.create(user, first.canvas_id, edge(first.a, second.b)).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn deleting_a_node_drops_its_connections() {
        let db = Arc::new(InMemoryDatabase::new());
        let svc = CanvasConnectionsService::new(db.clone());
        let nodes = CanvasNodesService::new(db.clone());
        let user = Uuid::new_v4();
        let board = board(&db, user).await;
        svc.create(user, board.canvas_id, edge(board.a, board.b))
            .await
            .unwrap();

        nodes.remove(user, board.canvas_id, board.b).await.unwrap();

        assert!(svc
            .find_all(user, board.canvas_id)
            .await
            .unwrap()
            .data
            .is_empty());
    }

    #[tokio::test]
    async fn remove_hides_foreign_connections() {
        let db = Arc::new(InMemoryDatabase::new());
        let svc = CanvasConnectionsService::new(db.clone());
        let user = Uuid::new_v4();
        let board = board(&db, user).await;
        let conn = svc
            .create(user, board.canvas_id, edge(board.b, board.a))
            .await
            .unwrap();

        assert!(matches!(
            svc.remove(Uuid::new_v4(), board.canvas_id, conn.id).await,
            Err(PortError::NotFound(_))
        ));
        assert_eq!(
            svc.remove(user, board.canvas_id, conn.id)
                .await
                .unwrap()
                .message,
            CONNECTION_DELETED
        );
    }
}
