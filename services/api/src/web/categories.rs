//! services/api/src/web/categories.rs
//!
//! Thin handlers: pull the caller out of the request and hand everything to
//! `CategoriesService`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use ideaboard_core::domain::{
    Category, CreateCategory, DataEnvelope, MessageEnvelope, UpdateCategory,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Blank name or malformed color")
    )
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(dto): Json<CreateCategory>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.categories.create(user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "The caller's categories by name, wrapped in `data`", body = [Category])
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<DataEnvelope<Vec<Category>>>, ApiError> {
    Ok(Json(state.categories.find_all(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "The category", body = Category),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.categories.find_one(user_id, id).await?))
}

#[utoipa::path(
    patch,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Updated category, wrapped in `data`", body = Category),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateCategory>,
) -> Result<Json<DataEnvelope<Category>>, ApiError> {
    Ok(Json(state.categories.update(user_id, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    Ok(Json(state.categories.remove(user_id, id).await?))
}
