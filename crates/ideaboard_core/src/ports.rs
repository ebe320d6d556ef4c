//! crates/ideaboard_core/src/ports.rs
//!
//! Defines the storage contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! services to be independent of a specific database.
//!
//! Every user-scoped method takes the calling user's id and enforces ownership
//! inside the same storage operation: a row that exists but belongs to someone
//! else is reported exactly like a missing row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::{
    AnalyticsEvent, Canvas, CanvasConnection, CanvasGraph, CanvasNode, Category,
    CreateCanvasConnection, CreateCanvasNode, CreateTask, EventCount, Idea, NewUser, Task,
    UpdateCanvasConnection, UpdateCanvasNode, UpdateCategory, UpdateIdea, UpdateProfile,
    UpdateTask, User, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username or phone is already taken.
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_username(&self, username: &str) -> PortResult<UserCredentials>;

    async fn update_user_profile(&self, user_id: Uuid, patch: UpdateProfile) -> PortResult<User>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owning user id of a session that has not expired.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    /// Drops every session past its expiry and returns how many were removed.
    async fn purge_expired_auth_sessions(&self) -> PortResult<u64>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(&self, user_id: Uuid, name: &str, color: &str) -> PortResult<Category>;

    /// Ordered by name ascending, ignoring ASCII case; names equal up to case
    /// fall back to byte order. Both adapters sort the same way regardless of
    /// the database collation.
    async fn list_categories(&self, user_id: Uuid) -> PortResult<Vec<Category>>;

    async fn get_category(&self, user_id: Uuid, id: Uuid) -> PortResult<Category>;

    async fn update_category(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: UpdateCategory,
    ) -> PortResult<Category>;

    async fn delete_category(&self, user_id: Uuid, id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait IdeaRepository: Send + Sync {
    async fn create_idea(
        &self,
        user_id: Uuid,
        content: &str,
        source: Option<JsonValue>,
    ) -> PortResult<Idea>;

    /// Newest first.
    async fn list_ideas(&self, user_id: Uuid) -> PortResult<Vec<Idea>>;

    async fn get_idea(&self, user_id: Uuid, id: Uuid) -> PortResult<Idea>;

    async fn update_idea(&self, user_id: Uuid, id: Uuid, patch: UpdateIdea) -> PortResult<Idea>;

    /// Unlinks tasks and canvas nodes that pointed at the idea.
    async fn delete_idea(&self, user_id: Uuid, id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Fails with `NotFound` when `dto.idea_id` is not one of the user's ideas.
    async fn create_task(&self, user_id: Uuid, dto: CreateTask) -> PortResult<Task>;

    /// Newest first.
    async fn list_tasks(&self, user_id: Uuid) -> PortResult<Vec<Task>>;

    async fn get_task(&self, user_id: Uuid, id: Uuid) -> PortResult<Task>;

    async fn update_task(&self, user_id: Uuid, id: Uuid, patch: UpdateTask) -> PortResult<Task>;

    async fn delete_task(&self, user_id: Uuid, id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait CanvasRepository: Send + Sync {
    // --- Canvases ---
    async fn create_canvas(&self, user_id: Uuid, name: &str) -> PortResult<Canvas>;

    /// Newest first.
    async fn list_canvases(&self, user_id: Uuid) -> PortResult<Vec<Canvas>>;

    async fn get_canvas(&self, user_id: Uuid, id: Uuid) -> PortResult<Canvas>;

    async fn get_canvas_graph(&self, user_id: Uuid, id: Uuid) -> PortResult<CanvasGraph>;

    async fn rename_canvas(&self, user_id: Uuid, id: Uuid, name: &str) -> PortResult<Canvas>;

    /// Removes the canvas together with its nodes and connections.
    async fn delete_canvas(&self, user_id: Uuid, id: Uuid) -> PortResult<()>;

    // --- Nodes ---
    async fn create_node(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        dto: CreateCanvasNode,
    ) -> PortResult<CanvasNode>;

    /// Oldest first.
    async fn list_nodes(&self, user_id: Uuid, canvas_id: Uuid) -> PortResult<Vec<CanvasNode>>;

    async fn get_node(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<CanvasNode>;

    async fn update_node(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
        patch: UpdateCanvasNode,
    ) -> PortResult<CanvasNode>;

    /// Removes the node and every connection touching it.
    async fn delete_node(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<()>;

    // --- Connections ---
    /// Fails with `NotFound` unless both endpoints are nodes of `canvas_id`.
    async fn create_connection(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        dto: CreateCanvasConnection,
    ) -> PortResult<CanvasConnection>;

    /// Oldest first.
    async fn list_connections(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
    ) -> PortResult<Vec<CanvasConnection>>;

    async fn get_connection(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
    ) -> PortResult<CanvasConnection>;

    async fn update_connection(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
        patch: UpdateCanvasConnection,
    ) -> PortResult<CanvasConnection>;

    async fn delete_connection(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn record_event(
        &self,
        user_id: Option<Uuid>,
        event_name: &str,
        metadata: Option<JsonValue>,
    ) -> PortResult<AnalyticsEvent>;

    /// Newest first.
    async fn list_events(&self, user_id: Uuid) -> PortResult<Vec<AnalyticsEvent>>;

    /// Grouped by event name, highest count first, ties broken by name in the
    /// same order as `list_categories`.
    async fn count_events_by_name(&self, user_id: Uuid) -> PortResult<Vec<EventCount>>;
}

/// The full storage surface the services depend on.
pub trait DatabaseService:
    UserRepository
    + CategoryRepository
    + IdeaRepository
    + TaskRepository
    + CanvasRepository
    + AnalyticsRepository
{
}

impl<T> DatabaseService for T where
    T: UserRepository
        + CategoryRepository
        + IdeaRepository
        + TaskRepository
        + CanvasRepository
        + AnalyticsRepository
{
}
