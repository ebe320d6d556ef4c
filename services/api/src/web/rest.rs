//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, plus the health probe.

use axum::Json;
use ideaboard_core::domain::{
    AnalyticsEvent, Canvas, CanvasConnection, CanvasGraph, CanvasNode, Category,
    CreateAnalyticsEvent, CreateCanvas, CreateCanvasConnection, CreateCanvasNode, CreateCategory,
    CreateIdea, CreateTask, EventCount, Idea, LoginRequest, MessageEnvelope, SignupRequest, Task,
    TaskStatus, UpdateCanvas, UpdateCanvasConnection, UpdateCanvasNode, UpdateCategory,
    UpdateIdea, UpdateProfile, UpdateTask, User,
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::web::{analytics, auth, canvases, categories, ideas, tasks};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        auth::update_me_handler,
        categories::create_category,
        categories::list_categories,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        ideas::create_idea,
        ideas::list_ideas,
        ideas::get_idea,
        ideas::update_idea,
        ideas::delete_idea,
        tasks::create_task,
        tasks::list_tasks,
        tasks::get_task,
        tasks::update_task,
        tasks::delete_task,
        canvases::create_canvas,
        canvases::list_canvases,
        canvases::get_canvas,
        canvases::get_canvas_graph,
        canvases::update_canvas,
        canvases::delete_canvas,
        canvases::create_node,
        canvases::list_nodes,
        canvases::get_node,
        canvases::update_node,
        canvases::delete_node,
        canvases::create_connection,
        canvases::list_connections,
        canvases::get_connection,
        canvases::update_connection,
        canvases::delete_connection,
        analytics::record_event,
        analytics::list_events,
        analytics::event_summary,
    ),
    components(
        schemas(
            HealthResponse, User, SignupRequest, LoginRequest, UpdateProfile,
            Category, CreateCategory, UpdateCategory,
            Idea, CreateIdea, UpdateIdea,
            Task, TaskStatus, CreateTask, UpdateTask,
            Canvas, CreateCanvas, UpdateCanvas, CanvasGraph,
            CanvasNode, CreateCanvasNode, UpdateCanvasNode,
            CanvasConnection, CreateCanvasConnection, UpdateCanvasConnection,
            AnalyticsEvent, CreateAnalyticsEvent, EventCount, MessageEnvelope
        )
    ),
    tags(
        (name = "Ideaboard API", description = "Ideas, tasks, categories and canvases scoped to the signed-in user.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Health
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
