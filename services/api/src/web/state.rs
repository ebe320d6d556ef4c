//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use chrono::Duration;
use ideaboard_core::ports::DatabaseService;
use ideaboard_core::services::{
    AnalyticsService, CanvasConnectionsService, CanvasNodesService, CanvasesService,
    CategoriesService, IdeasService, TasksService, UsersService,
};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: UsersService,
    pub categories: CategoriesService,
    pub ideas: IdeasService,
    pub tasks: TasksService,
    pub canvases: CanvasesService,
    pub canvas_nodes: CanvasNodesService,
    pub canvas_connections: CanvasConnectionsService,
    pub analytics: AnalyticsService,
}

impl AppState {
    /// Wires every service to the same storage backend.
    pub fn new(db: Arc<dyn DatabaseService>, config: Arc<Config>) -> Self {
        Self {
            users: UsersService::new(db.clone(), Duration::days(config.session_ttl_days)),
            categories: CategoriesService::new(db.clone()),
            ideas: IdeasService::new(db.clone()),
            tasks: TasksService::new(db.clone()),
            canvases: CanvasesService::new(db.clone()),
            canvas_nodes: CanvasNodesService::new(db.clone()),
            canvas_connections: CanvasConnectionsService::new(db.clone()),
            analytics: AnalyticsService::new(db),
            config,
        }
    }
}
