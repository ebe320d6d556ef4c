pub mod analytics;
pub mod auth;
pub mod canvases;
pub mod categories;
pub mod ideas;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod tasks;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::ConfigError;
use crate::error::ApiError;
use crate::web::{
    middleware::{attach_user, require_auth},
    rest::{health_handler, ApiDoc},
    state::AppState,
};

pub use middleware::{AuthUser, MaybeUser};

/// Builds the complete application: public and protected API routes, CORS,
/// request tracing and the Swagger UI.
pub fn create_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string()))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Recording analytics works signed in or not; reading them does not.
    let analytics_routes = Router::new()
        .route(
            "/analytics/events",
            post(analytics::record_event)
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    attach_user,
                ))
                .merge(get(analytics::list_events).route_layer(
                    axum_middleware::from_fn_with_state(app_state.clone(), require_auth),
                )),
        )
        .route(
            "/analytics/summary",
            get(analytics::event_summary).route_layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                require_auth,
            )),
        );

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/users/me", get(auth::me_handler).patch(auth::update_me_handler))
        .route(
            "/categories",
            post(categories::create_category).get(categories::list_categories),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/ideas", post(ideas::create_idea).get(ideas::list_ideas))
        .route(
            "/ideas/{id}",
            get(ideas::get_idea)
                .patch(ideas::update_idea)
                .delete(ideas::delete_idea),
        )
        .route("/tasks", post(tasks::create_task).get(tasks::list_tasks))
        .route(
            "/tasks/{id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/canvases",
            post(canvases::create_canvas).get(canvases::list_canvases),
        )
        .route(
            "/canvases/{canvas_id}",
            get(canvases::get_canvas)
                .patch(canvases::update_canvas)
                .delete(canvases::delete_canvas),
        )
        .route("/canvases/{canvas_id}/graph", get(canvases::get_canvas_graph))
        .route(
            "/canvases/{canvas_id}/nodes",
            post(canvases::create_node).get(canvases::list_nodes),
        )
        .route(
            "/canvases/{canvas_id}/nodes/{id}",
            get(canvases::get_node)
                .patch(canvases::update_node)
                .delete(canvases::delete_node),
        )
        .route(
            "/canvases/{canvas_id}/connections",
            post(canvases::create_connection).get(canvases::list_connections),
        )
        .route(
            "/canvases/{canvas_id}/connections/{id}",
            get(canvases::get_connection)
                .patch(canvases::update_connection)
                .delete(canvases::delete_connection),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(analytics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())))
}
