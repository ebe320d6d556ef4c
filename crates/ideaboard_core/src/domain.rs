//! crates/ideaboard_core/src/domain.rs
//!
//! Defines the core data structures for the application: the stored entities,
//! the create/update payloads accepted for them, and the response envelopes.
//! These structs are independent of any database driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Users and Auth
//=========================================================================================

/// Represents a user - used throughout the app.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub phone: Option<String>,
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Everything needed to insert a user row. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub phone: Option<String>,
    pub nickname: Option<String>,
    pub password_hash: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub phone: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub nickname: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
}

//=========================================================================================
// Categories
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCategory {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub color: Option<String>,
}

//=========================================================================================
// Ideas
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    #[schema(value_type = Option<Object>)]
    pub source: Option<JsonValue>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIdea {
    pub content: String,
    #[schema(value_type = Option<Object>)]
    pub source: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateIdea {
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Object>)]
    pub source: Option<Option<JsonValue>>,
}

//=========================================================================================
// Tasks
//=========================================================================================

/// The workflow state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown task status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub idea_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub category: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    pub category: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub idea_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub idea_id: Option<Option<Uuid>>,
}

//=========================================================================================
// Canvases, Nodes and Connections
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCanvas {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCanvas {
    pub name: Option<String>,
}

/// A positioned box on a canvas, optionally pinned to an idea.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: Uuid,
    pub canvas_id: Uuid,
    pub idea_id: Option<Uuid>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCanvasNode {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: Option<String>,
    pub idea_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCanvasNode {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub idea_id: Option<Option<Uuid>>,
}

/// A directed edge between two nodes of the same canvas.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConnection {
    pub id: Uuid,
    pub canvas_id: Uuid,
    pub from_node_id: Uuid,
    pub to_node_id: Uuid,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCanvasConnection {
    pub from_node_id: Uuid,
    pub to_node_id: Uuid,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCanvasConnection {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub label: Option<Option<String>>,
}

/// A canvas together with all of its nodes and connections.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CanvasGraph {
    pub canvas: Canvas,
    pub nodes: Vec<CanvasNode>,
    pub connections: Vec<CanvasConnection>,
}

//=========================================================================================
// Analytics
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub event_name: String,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnalyticsEvent {
    pub event_name: String,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<JsonValue>,
}

/// Number of events a user emitted under one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventCount {
    pub event_name: String,
    pub count: i64,
}

//=========================================================================================
// Response Envelopes
//=========================================================================================

/// The `{ "data": ... }` wrapper returned by list and update endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// The `{ "message": ... }` wrapper returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MessageEnvelope {
    pub message: String,
}

impl MessageEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//=========================================================================================
// Serde helpers
//=========================================================================================

/// Keeps an explicit `null` apart from a missing field in PATCH bodies.
///
/// Combined with `#[serde(default)]`: missing -> `None`, `null` -> `Some(None)`,
/// a value -> `Some(Some(v))`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_distinguishes_null_from_missing() {
        let patch: UpdateTask =
            serde_json::from_value(json!({ "description": null, "title": "t" })).unwrap();
        assert_eq!(patch.title.as_deref(), Some("t"));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.category, None);
        assert_eq!(patch.idea_id, None);
    }

    #[test]
    fn task_status_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            json!("in_progress")
        );
        assert_eq!("done".parse::<TaskStatus>(), Ok(TaskStatus::Done));
        assert!("finished".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn create_task_defaults_to_todo() {
        let dto: CreateTask = serde_json::from_value(json!({ "title": "write" })).unwrap();
        assert_eq!(dto.status, TaskStatus::Todo);
        assert!(dto.idea_id.is_none());
    }

    #[test]
    fn entities_serialize_in_camel_case() {
        let now = Utc::now();
        let category = Category {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            name: "Work".into(),
            color: "#ff0000".into(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(DataEnvelope::new(vec![category])).unwrap();
        assert!(value["data"][0].get("userId").is_some());
        assert!(value["data"][0].get("createdAt").is_some());
    }
}
