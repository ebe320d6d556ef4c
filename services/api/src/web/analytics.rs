//! services/api/src/web/analytics.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use ideaboard_core::domain::{AnalyticsEvent, CreateAnalyticsEvent, DataEnvelope, EventCount};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::middleware::{AuthUser, MaybeUser};
use crate::web::state::AppState;

/// Anonymous callers may record events too; the event is then unowned.
#[utoipa::path(
    post,
    path = "/analytics/events",
    tag = "analytics",
    request_body = CreateAnalyticsEvent,
    responses(
        (status = 201, description = "Event recorded", body = AnalyticsEvent),
        (status = 400, description = "Blank event name")
    )
)]
pub async fn record_event(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user_id)): Extension<MaybeUser>,
    Json(dto): Json<CreateAnalyticsEvent>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.analytics.record(user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/analytics/events",
    tag = "analytics",
    responses((status = 200, description = "The caller's events, newest first, wrapped in `data`", body = [AnalyticsEvent]))
)]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<DataEnvelope<Vec<AnalyticsEvent>>>, ApiError> {
    Ok(Json(state.analytics.find_all(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/analytics/summary",
    tag = "analytics",
    responses((status = 200, description = "Event counts by name, wrapped in `data`", body = [EventCount]))
)]
pub async fn event_summary(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<DataEnvelope<Vec<EventCount>>>, ApiError> {
    Ok(Json(state.analytics.summary(user_id).await?))
}
