//! services/api/src/web/tasks.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use ideaboard_core::domain::{CreateTask, DataEnvelope, MessageEnvelope, Task, UpdateTask};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 404, description = "ideaId is not one of the caller's ideas")
    )
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(dto): Json<CreateTask>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state.tasks.create(user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    responses((status = 200, description = "The caller's tasks, newest first, wrapped in `data`", body = [Task]))
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<DataEnvelope<Vec<Task>>>, ApiError> {
    Ok(Json(state.tasks.find_all(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "The task", body = Task),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.find_one(user_id, id).await?))
}

#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Updated task, wrapped in `data`", body = Task),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateTask>,
) -> Result<Json<DataEnvelope<Task>>, ApiError> {
    Ok(Json(state.tasks.update(user_id, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    Ok(Json(state.tasks.remove(user_id, id).await?))
}
