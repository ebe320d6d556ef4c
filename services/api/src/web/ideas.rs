//! services/api/src/web/ideas.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use ideaboard_core::domain::{CreateIdea, DataEnvelope, Idea, MessageEnvelope, UpdateIdea};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

#[utoipa::path(
    post,
    path = "/ideas",
    tag = "ideas",
    request_body = CreateIdea,
    responses((status = 201, description = "Idea captured", body = Idea))
)]
pub async fn create_idea(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(dto): Json<CreateIdea>,
) -> Result<impl IntoResponse, ApiError> {
    let idea = state.ideas.create(user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(idea)))
}

#[utoipa::path(
    get,
    path = "/ideas",
    tag = "ideas",
    responses((status = 200, description = "The caller's ideas, newest first, wrapped in `data`", body = [Idea]))
)]
pub async fn list_ideas(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<DataEnvelope<Vec<Idea>>>, ApiError> {
    Ok(Json(state.ideas.find_all(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/ideas/{id}",
    tag = "ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 200, description = "The idea", body = Idea),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn get_idea(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Idea>, ApiError> {
    Ok(Json(state.ideas.find_one(user_id, id).await?))
}

#[utoipa::path(
    patch,
    path = "/ideas/{id}",
    tag = "ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    request_body = UpdateIdea,
    responses(
        (status = 200, description = "Updated idea, wrapped in `data`", body = Idea),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn update_idea(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateIdea>,
) -> Result<Json<DataEnvelope<Idea>>, ApiError> {
    Ok(Json(state.ideas.update(user_id, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/ideas/{id}",
    tag = "ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Deleted; linked tasks and nodes are unlinked", body = MessageEnvelope),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn delete_idea(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    Ok(Json(state.ideas.remove(user_id, id).await?))
}
