//! services/api/src/web/canvases.rs
//!
//! Canvas handlers, including the nested node and connection routes under
//! `/canvases/{canvas_id}/...`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use ideaboard_core::domain::{
    Canvas, CanvasConnection, CanvasGraph, CanvasNode, CreateCanvas, CreateCanvasConnection,
    CreateCanvasNode, DataEnvelope, MessageEnvelope, UpdateCanvas, UpdateCanvasConnection,
    UpdateCanvasNode,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

//=========================================================================================
// Canvases
//=========================================================================================

#[utoipa::path(
    post,
    path = "/canvases",
    tag = "canvases",
    request_body = CreateCanvas,
    responses((status = 201, description = "Canvas created", body = Canvas))
)]
pub async fn create_canvas(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(dto): Json<CreateCanvas>,
) -> Result<impl IntoResponse, ApiError> {
    let canvas = state.canvases.create(user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(canvas)))
}

#[utoipa::path(
    get,
    path = "/canvases",
    tag = "canvases",
    responses((status = 200, description = "The caller's canvases, newest first, wrapped in `data`", body = [Canvas]))
)]
pub async fn list_canvases(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<DataEnvelope<Vec<Canvas>>>, ApiError> {
    Ok(Json(state.canvases.find_all(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/canvases/{canvas_id}",
    tag = "canvases",
    params(("canvas_id" = Uuid, Path, description = "Canvas id")),
    responses(
        (status = 200, description = "The canvas", body = Canvas),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn get_canvas(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Canvas>, ApiError> {
    Ok(Json(state.canvases.find_one(user_id, id).await?))
}

#[utoipa::path(
    get,
    path = "/canvases/{canvas_id}/graph",
    tag = "canvases",
    params(("canvas_id" = Uuid, Path, description = "Canvas id")),
    responses(
        (status = 200, description = "Canvas with nodes and connections, wrapped in `data`", body = CanvasGraph),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn get_canvas_graph(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataEnvelope<CanvasGraph>>, ApiError> {
    Ok(Json(state.canvases.find_graph(user_id, id).await?))
}

#[utoipa::path(
    patch,
    path = "/canvases/{canvas_id}",
    tag = "canvases",
    params(("canvas_id" = Uuid, Path, description = "Canvas id")),
    request_body = UpdateCanvas,
    responses(
        (status = 200, description = "Updated canvas, wrapped in `data`", body = Canvas),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn update_canvas(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateCanvas>,
) -> Result<Json<DataEnvelope<Canvas>>, ApiError> {
    Ok(Json(state.canvases.update(user_id, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/canvases/{canvas_id}",
    tag = "canvases",
    params(("canvas_id" = Uuid, Path, description = "Canvas id")),
    responses(
        (status = 200, description = "Deleted with all nodes and connections", body = MessageEnvelope),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn delete_canvas(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    Ok(Json(state.canvases.remove(user_id, id).await?))
}

//=========================================================================================
// Nodes
//=========================================================================================

#[utoipa::path(
    post,
    path = "/canvases/{canvas_id}/nodes",
    tag = "canvas nodes",
    params(("canvas_id" = Uuid, Path, description = "Canvas id")),
    request_body = CreateCanvasNode,
    responses(
        (status = 201, description = "Node placed", body = CanvasNode),
        (status = 404, description = "Canvas or linked idea not found")
    )
)]
pub async fn create_node(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(canvas_id): Path<Uuid>,
    Json(dto): Json<CreateCanvasNode>,
) -> Result<impl IntoResponse, ApiError> {
    let node = state.canvas_nodes.create(user_id, canvas_id, dto).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

#[utoipa::path(
    get,
    path = "/canvases/{canvas_id}/nodes",
    tag = "canvas nodes",
    params(("canvas_id" = Uuid, Path, description = "Canvas id")),
    responses((status = 200, description = "Nodes of the canvas, wrapped in `data`", body = [CanvasNode]))
)]
pub async fn list_nodes(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(canvas_id): Path<Uuid>,
) -> Result<Json<DataEnvelope<Vec<CanvasNode>>>, ApiError> {
    Ok(Json(state.canvas_nodes.find_all(user_id, canvas_id).await?))
}

#[utoipa::path(
    get,
    path = "/canvases/{canvas_id}/nodes/{id}",
    tag = "canvas nodes",
    params(
        ("canvas_id" = Uuid, Path, description = "Canvas id"),
        ("id" = Uuid, Path, description = "Node id")
    ),
    responses(
        (status = 200, description = "The node", body = CanvasNode),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn get_node(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path((canvas_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CanvasNode>, ApiError> {
    Ok(Json(state.canvas_nodes.find_one(user_id, canvas_id, id).await?))
}

#[utoipa::path(
    patch,
    path = "/canvases/{canvas_id}/nodes/{id}",
    tag = "canvas nodes",
    params(
        ("canvas_id" = Uuid, Path, description = "Canvas id"),
        ("id" = Uuid, Path, description = "Node id")
    ),
    request_body = UpdateCanvasNode,
    responses(
        (status = 200, description = "Updated node, wrapped in `data`", body = CanvasNode),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn update_node(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path((canvas_id, id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<UpdateCanvasNode>,
) -> Result<Json<DataEnvelope<CanvasNode>>, ApiError> {
    Ok(Json(
        state.canvas_nodes.update(user_id, canvas_id, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/canvases/{canvas_id}/nodes/{id}",
    tag = "canvas nodes",
    params(
        ("canvas_id" = Uuid, Path, description = "Canvas id"),
        ("id" = Uuid, Path, description = "Node id")
    ),
    responses(
        (status = 200, description = "Deleted with its connections", body = MessageEnvelope),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn delete_node(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path((canvas_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    Ok(Json(state.canvas_nodes.remove(user_id, canvas_id, id).await?))
}

//=========================================================================================
// Connections
//=========================================================================================

#[utoipa::path(
    post,
    path = "/canvases/{canvas_id}/connections",
    tag = "canvas connections",
    params(("canvas_id" = Uuid, Path, description = "Canvas id")),
    request_body = CreateCanvasConnection,
    responses(
        (status = 201, description = "Nodes connected", body = CanvasConnection),
        (status = 400, description = "Both ends are the same node"),
        (status = 404, description = "Canvas or an endpoint not found on this canvas")
    )
)]
pub async fn create_connection(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(canvas_id): Path<Uuid>,
    Json(dto): Json<CreateCanvasConnection>,
) -> Result<impl IntoResponse, ApiError> {
    let connection = state
        .canvas_connections
        .create(user_id, canvas_id, dto)
        .await?;
    Ok((StatusCode::CREATED, Json(connection)))
}

#[utoipa::path(
    get,
    path = "/canvases/{canvas_id}/connections",
    tag = "canvas connections",
    params(("canvas_id" = Uuid, Path, description = "Canvas id")),
    responses((status = 200, description = "Connections of the canvas, wrapped in `data`", body = [CanvasConnection]))
)]
pub async fn list_connections(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(canvas_id): Path<Uuid>,
) -> Result<Json<DataEnvelope<Vec<CanvasConnection>>>, ApiError> {
    Ok(Json(
        state.canvas_connections.find_all(user_id, canvas_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/canvases/{canvas_id}/connections/{id}",
    tag = "canvas connections",
    params(
        ("canvas_id" = Uuid, Path, description = "Canvas id"),
        ("id" = Uuid, Path, description = "Connection id")
    ),
    responses(
        (status = 200, description = "The connection", body = CanvasConnection),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn get_connection(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path((canvas_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CanvasConnection>, ApiError> {
    Ok(Json(
        state
            .canvas_connections
            .find_one(user_id, canvas_id, id)
            .await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/canvases/{canvas_id}/connections/{id}",
    tag = "canvas connections",
    params(
        ("canvas_id" = Uuid, Path, description = "Canvas id"),
        ("id" = Uuid, Path, description = "Connection id")
    ),
    request_body = UpdateCanvasConnection,
    responses(
        (status = 200, description = "Relabeled connection, wrapped in `data`", body = CanvasConnection),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn update_connection(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path((canvas_id, id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<UpdateCanvasConnection>,
) -> Result<Json<DataEnvelope<CanvasConnection>>, ApiError> {
    Ok(Json(
        state
            .canvas_connections
            .update(user_id, canvas_id, id, dto)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/canvases/{canvas_id}/connections/{id}",
    tag = "canvas connections",
    params(
        ("canvas_id" = Uuid, Path, description = "Canvas id"),
        ("id" = Uuid, Path, description = "Connection id")
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn delete_connection(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path((canvas_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    Ok(Json(
        state
            .canvas_connections
            .remove(user_id, canvas_id, id)
            .await?,
    ))
}
