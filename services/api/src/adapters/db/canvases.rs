//! services/api/src/adapters/db/canvases.rs
//!
//! Canvases plus their nodes and connections. Nodes and connections carry no
//! `user_id` of their own; they are scoped through the owning canvas.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ideaboard_core::domain::{
    Canvas, CanvasConnection, CanvasGraph, CanvasNode, CreateCanvasConnection, CreateCanvasNode,
    UpdateCanvasConnection, UpdateCanvasNode,
};
use ideaboard_core::ports::{CanvasRepository, PortResult};
use sqlx::FromRow;
use uuid::Uuid;

use super::{not_found, require_canvas, require_idea, unexpected, DbAdapter};

const CANVAS_COLUMNS: &str = "id, user_id, name, deleted_at, created_at, updated_at";
const NODE_COLUMNS: &str =
    "id, canvas_id, idea_id, x, y, width, height, content, created_at, updated_at";
const CONNECTION_COLUMNS: &str =
    "id, canvas_id, from_node_id, to_node_id, label, created_at, updated_at";

/// Restricts a node/connection statement to canvases owned by `$3`.
const OWNED_CANVAS: &str = "EXISTS (SELECT 1 FROM canvases c WHERE c.id = $2 AND c.user_id = $3)";

//=========================================================================================
// Records
//=========================================================================================

#[derive(FromRow)]
struct CanvasRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CanvasRecord {
    fn to_domain(self) -> Canvas {
        Canvas {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct NodeRecord {
    id: Uuid,
    canvas_id: Uuid,
    idea_id: Option<Uuid>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    content: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NodeRecord {
    fn to_domain(self) -> CanvasNode {
        CanvasNode {
            id: self.id,
            canvas_id: self.canvas_id,
            idea_id: self.idea_id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ConnectionRecord {
    id: Uuid,
    canvas_id: Uuid,
    from_node_id: Uuid,
    to_node_id: Uuid,
    label: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConnectionRecord {
    fn to_domain(self) -> CanvasConnection {
        CanvasConnection {
            id: self.id,
            canvas_id: self.canvas_id,
            from_node_id: self.from_node_id,
            to_node_id: self.to_node_id,
            label: self.label,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl DbAdapter {
    async fn nodes_of<'e, E>(&self, executor: E, canvas_id: Uuid) -> PortResult<Vec<CanvasNode>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let records = sqlx::query_as::<_, NodeRecord>(&format!(
            "SELECT {NODE_COLUMNS} FROM canvas_nodes WHERE canvas_id = $1 \
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(canvas_id)
        .fetch_all(executor)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn connections_of<'e, E>(
        &self,
        executor: E,
        canvas_id: Uuid,
    ) -> PortResult<Vec<CanvasConnection>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let records = sqlx::query_as::<_, ConnectionRecord>(&format!(
            "SELECT {CONNECTION_COLUMNS} FROM canvas_connections WHERE canvas_id = $1 \
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(canvas_id)
        .fetch_all(executor)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}

#[async_trait]
impl CanvasRepository for DbAdapter {
    //=====================================================================================
    // Canvases
    //=====================================================================================

    async fn create_canvas(&self, user_id: Uuid, name: &str) -> PortResult<Canvas> {
        let record = sqlx::query_as::<_, CanvasRecord>(&format!(
            "INSERT INTO canvases (id, user_id, name) VALUES ($1, $2, $3) RETURNING {CANVAS_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_canvases(&self, user_id: Uuid) -> PortResult<Vec<Canvas>> {
        let records = sqlx::query_as::<_, CanvasRecord>(&format!(
            "SELECT {CANVAS_COLUMNS} FROM canvases WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_canvas(&self, user_id: Uuid, id: Uuid) -> PortResult<Canvas> {
        let record = sqlx::query_as::<_, CanvasRecord>(&format!(
            "SELECT {CANVAS_COLUMNS} FROM canvases WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Canvas", id))?;
        Ok(record.to_domain())
    }

    async fn get_canvas_graph(&self, user_id: Uuid, id: Uuid) -> PortResult<CanvasGraph> {
        // One snapshot for the canvas and its children.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        let canvas = sqlx::query_as::<_, CanvasRecord>(&format!(
            "SELECT {CANVAS_COLUMNS} FROM canvases WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Canvas", id))?
        .to_domain();
        let nodes = self.nodes_of(&mut *tx, id).await?;
        let connections = self.connections_of(&mut *tx, id).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(CanvasGraph {
            canvas,
            nodes,
            connections,
        })
    }

    async fn rename_canvas(&self, user_id: Uuid, id: Uuid, name: &str) -> PortResult<Canvas> {
        let record = sqlx::query_as::<_, CanvasRecord>(&format!(
            "UPDATE canvases SET name = $3, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {CANVAS_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Canvas", id))?;
        Ok(record.to_domain())
    }

    async fn delete_canvas(&self, user_id: Uuid, id: Uuid) -> PortResult<()> {
        // Nodes and connections go with it through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM canvases WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(not_found("Canvas", id));
        }
        Ok(())
    }

    //=====================================================================================
    // Nodes
    //=====================================================================================

    async fn create_node(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        dto: CreateCanvasNode,
    ) -> PortResult<CanvasNode> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        require_canvas(&mut *tx, user_id, canvas_id).await?;
        if let Some(idea_id) = dto.idea_id {
            require_idea(&mut *tx, user_id, idea_id).await?;
        }
        let record = sqlx::query_as::<_, NodeRecord>(&format!(
            "INSERT INTO canvas_nodes (id, canvas_id, idea_id, x, y, width, height, content) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {NODE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(canvas_id)
        .bind(dto.idea_id)
        .bind(dto.x)
        .bind(dto.y)
        .bind(dto.width)
        .bind(dto.height)
        .bind(&dto.content)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_nodes(&self, user_id: Uuid, canvas_id: Uuid) -> PortResult<Vec<CanvasNode>> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        require_canvas(&mut *tx, user_id, canvas_id).await?;
        let nodes = self.nodes_of(&mut *tx, canvas_id).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(nodes)
    }

    async fn get_node(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<CanvasNode> {
        let record = sqlx::query_as::<_, NodeRecord>(&format!(
            "SELECT {NODE_COLUMNS} FROM canvas_nodes \
             WHERE id = $1 AND canvas_id = $2 AND {OWNED_CANVAS}"
        ))
        .bind(id)
        .bind(canvas_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Canvas node", id))?;
        Ok(record.to_domain())
    }

    async fn update_node(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
        patch: UpdateCanvasNode,
    ) -> PortResult<CanvasNode> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        if let Some(Some(idea_id)) = patch.idea_id {
            require_idea(&mut *tx, user_id, idea_id).await?;
        }
        let record = sqlx::query_as::<_, NodeRecord>(&format!(
            "UPDATE canvas_nodes SET \
                 x = COALESCE($4, x), \
                 y = COALESCE($5, y), \
                 width = COALESCE($6, width), \
                 height = COALESCE($7, height), \
                 content = CASE WHEN $8 THEN $9 ELSE content END, \
                 idea_id = CASE WHEN $10 THEN $11 ELSE idea_id END, \
                 updated_at = NOW() \
             WHERE id = $1 AND canvas_id = $2 AND {OWNED_CANVAS} \
             RETURNING {NODE_COLUMNS}"
        ))
        .bind(id)
        .bind(canvas_id)
        .bind(user_id)
        .bind(patch.x)
        .bind(patch.y)
        .bind(patch.width)
        .bind(patch.height)
        .bind(patch.content.is_some())
        .bind(patch.content.flatten())
        .bind(patch.idea_id.is_some())
        .bind(patch.idea_id.flatten())
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Canvas node", id))?;
        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn delete_node(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM canvas_nodes WHERE id = $1 AND canvas_id = $2 AND {OWNED_CANVAS}"
        ))
        .bind(id)
        .bind(canvas_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(not_found("Canvas node", id));
        }
        Ok(())
    }

    //=====================================================================================
    // Connections
    //=====================================================================================

    async fn create_connection(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        dto: CreateCanvasConnection,
    ) -> PortResult<CanvasConnection> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        require_canvas(&mut *tx, user_id, canvas_id).await?;
        for node_id in [dto.from_node_id, dto.to_node_id] {
            // FOR SHARE keeps the endpoint from being deleted before we insert.
            let found: Option<Uuid> = sqlx::query_scalar(
                "SELECT id FROM canvas_nodes WHERE id = $1 AND canvas_id = $2 FOR SHARE",
            )
            .bind(node_id)
            .bind(canvas_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?;
            if found.is_none() {
                return Err(not_found("Canvas node", node_id));
            }
        }
        let record = sqlx::query_as::<_, ConnectionRecord>(&format!(
            "INSERT INTO canvas_connections (id, canvas_id, from_node_id, to_node_id, label) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {CONNECTION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(canvas_id)
        .bind(dto.from_node_id)
        .bind(dto.to_node_id)
        .bind(&dto.label)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_connections(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
    ) -> PortResult<Vec<CanvasConnection>> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        require_canvas(&mut *tx, user_id, canvas_id).await?;
        let connections = self.connections_of(&mut *tx, canvas_id).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(connections)
    }

    async fn get_connection(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
    ) -> PortResult<CanvasConnection> {
        let record = sqlx::query_as::<_, ConnectionRecord>(&format!(
            "SELECT {CONNECTION_COLUMNS} FROM canvas_connections \
             WHERE id = $1 AND canvas_id = $2 AND {OWNED_CANVAS}"
        ))
        .bind(id)
        .bind(canvas_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Canvas connection", id))?;
        Ok(record.to_domain())
    }

    async fn update_connection(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
        patch: UpdateCanvasConnection,
    ) -> PortResult<CanvasConnection> {
        let record = sqlx::query_as::<_, ConnectionRecord>(&format!(
            "UPDATE canvas_connections SET \
                 label = CASE WHEN $4 THEN $5 ELSE label END, \
                 updated_at = NOW() \
             WHERE id = $1 AND canvas_id = $2 AND {OWNED_CANVAS} \
             RETURNING {CONNECTION_COLUMNS}"
        ))
        .bind(id)
        .bind(canvas_id)
        .bind(user_id)
        .bind(patch.label.is_some())
        .bind(patch.label.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| not_found("Canvas connection", id))?;
        Ok(record.to_domain())
    }

    async fn delete_connection(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM canvas_connections WHERE id = $1 AND canvas_id = $2 AND {OWNED_CANVAS}"
        ))
        .bind(id)
        .bind(canvas_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(not_found("Canvas connection", id));
        }
        Ok(())
    }
}
