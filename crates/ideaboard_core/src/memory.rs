//! crates/ideaboard_core/src/memory.rs
//!
//! An in-process implementation of every storage port. Used by the test
//! suites and by `STORAGE_BACKEND=memory` local runs.
//!
//! Each table is a `Vec` kept in insertion order, so "newest first" is a
//! reverse walk. Every operation holds the single lock for its whole duration,
//! which gives the same all-or-nothing behaviour as the conditional SQL used
//! by the Postgres adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    AnalyticsEvent, AuthSession, Canvas, CanvasConnection, CanvasGraph, CanvasNode, Category,
    CreateCanvasConnection, CreateCanvasNode, CreateTask, EventCount, Idea, NewUser, Task,
    UpdateCanvasConnection, UpdateCanvasNode, UpdateCategory, UpdateIdea, UpdateProfile,
    UpdateTask, User, UserCredentials,
};
use crate::ports::{
    AnalyticsRepository, CanvasRepository, CategoryRepository, IdeaRepository, PortError,
    PortResult, TaskRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    auth_sessions: HashMap<String, AuthSession>,
    categories: Vec<Category>,
    ideas: Vec<Idea>,
    tasks: Vec<Task>,
    canvases: Vec<Canvas>,
    nodes: Vec<CanvasNode>,
    connections: Vec<CanvasConnection>,
    events: Vec<AnalyticsEvent>,
}

impl Tables {
    fn owns_idea(&self, user_id: Uuid, idea_id: Uuid) -> bool {
        self.ideas
            .iter()
            .any(|i| i.id == idea_id && i.user_id == user_id)
    }

    fn owns_canvas(&self, user_id: Uuid, canvas_id: Uuid) -> bool {
        self.canvases
            .iter()
            .any(|c| c.id == canvas_id && c.user_id == user_id)
    }

    fn require_canvas(&self, user_id: Uuid, canvas_id: Uuid) -> PortResult<()> {
        if self.owns_canvas(user_id, canvas_id) {
            Ok(())
        } else {
            Err(not_found("Canvas", canvas_id))
        }
    }

    fn require_idea(&self, user_id: Uuid, idea_id: Option<Uuid>) -> PortResult<()> {
        match idea_id {
            Some(id) if !self.owns_idea(user_id, id) => Err(not_found("Idea", id)),
            _ => Ok(()),
        }
    }
}

/// ASCII case-insensitive, then byte-wise. Matches the Postgres adapter's
/// `ORDER BY LOWER(x) COLLATE "C", x COLLATE "C"`.
fn name_order(a: &str, b: &str) -> Ordering {
    a.to_ascii_lowercase()
        .cmp(&b.to_ascii_lowercase())
        .then_with(|| a.cmp(b))
}

fn not_found(kind: &str, id: Uuid) -> PortError {
    PortError::NotFound(format!("{} {} not found", kind, id))
}

/// In-memory storage adapter.
#[derive(Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

//=========================================================================================
// Users and Auth Sessions
//=========================================================================================

#[async_trait]
impl UserRepository for InMemoryDatabase {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.user.username == new_user.username) {
            return Err(PortError::Conflict(format!(
                "username '{}' is already taken",
                new_user.username
            )));
        }
        if let Some(phone) = new_user.phone.as_deref() {
            if t.users.iter().any(|u| u.user.phone.as_deref() == Some(phone)) {
                return Err(PortError::Conflict("phone is already registered".to_string()));
            }
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            phone: new_user.phone,
            nickname: new_user.nickname,
            created_at: now,
            updated_at: now,
        };
        t.users.push(UserCredentials {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let t = self.tables.read().await;
        t.users
            .iter()
            .find(|u| u.user.id == user_id)
            .map(|u| u.user.clone())
            .ok_or_else(|| not_found("User", user_id))
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<UserCredentials> {
        let t = self.tables.read().await;
        t.users
            .iter()
            .find(|u| u.user.username == username)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User '{}' not found", username)))
    }

    async fn update_user_profile(&self, user_id: Uuid, patch: UpdateProfile) -> PortResult<User> {
        let mut t = self.tables.write().await;
        if let Some(Some(phone)) = patch.phone.as_ref() {
            if t
                .users
                .iter()
                .any(|u| u.user.id != user_id && u.user.phone.as_deref() == Some(phone.as_str()))
            {
                return Err(PortError::Conflict("phone is already registered".to_string()));
            }
        }
        let row = t
            .users
            .iter_mut()
            .find(|u| u.user.id == user_id)
            .ok_or_else(|| not_found("User", user_id))?;
        if let Some(nickname) = patch.nickname {
            row.user.nickname = nickname;
        }
        if let Some(phone) = patch.phone {
            row.user.phone = phone;
        }
        row.user.updated_at = Utc::now();
        Ok(row.user.clone())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut t = self.tables.write().await;
        t.auth_sessions.insert(
            session_id.to_string(),
            AuthSession {
                id: session_id.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let t = self.tables.read().await;
        t.auth_sessions
            .get(session_id)
            .filter(|s| s.expires_at > Utc::now())
            .map(|s| s.user_id)
            .ok_or_else(|| PortError::NotFound("Auth session not found or expired".to_string()))
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        let mut t = self.tables.write().await;
        t.auth_sessions.remove(session_id);
        Ok(())
    }

    async fn purge_expired_auth_sessions(&self) -> PortResult<u64> {
        let mut t = self.tables.write().await;
        let before = t.auth_sessions.len();
        let now = Utc::now();
        t.auth_sessions.retain(|_, s| s.expires_at > now);
        Ok((before - t.auth_sessions.len()) as u64)
    }
}

//=========================================================================================
// Categories
//=========================================================================================

#[async_trait]
impl CategoryRepository for InMemoryDatabase {
    async fn create_category(&self, user_id: Uuid, name: &str, color: &str) -> PortResult<Category> {
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            color: color.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.categories.push(category.clone());
        Ok(category)
    }

    async fn list_categories(&self, user_id: Uuid) -> PortResult<Vec<Category>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Category> = t
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            name_order(&a.name, &b.name).then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn get_category(&self, user_id: Uuid, id: Uuid) -> PortResult<Category> {
        let t = self.tables.read().await;
        t.categories
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned()
            .ok_or_else(|| not_found("Category", id))
    }

    async fn update_category(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: UpdateCategory,
    ) -> PortResult<Category> {
        let mut t = self.tables.write().await;
        let row = t
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
            .ok_or_else(|| not_found("Category", id))?;
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(color) = patch.color {
            row.color = color;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_category(&self, user_id: Uuid, id: Uuid) -> PortResult<()> {
        let mut t = self.tables.write().await;
        let before = t.categories.len();
        t.categories.retain(|c| !(c.id == id && c.user_id == user_id));
        if t.categories.len() == before {
            return Err(not_found("Category", id));
        }
        Ok(())
    }
}

//=========================================================================================
// Ideas
//=========================================================================================

#[async_trait]
impl IdeaRepository for InMemoryDatabase {
    async fn create_idea(
        &self,
        user_id: Uuid,
        content: &str,
        source: Option<JsonValue>,
    ) -> PortResult<Idea> {
        let now = Utc::now();
        let idea = Idea {
            id: Uuid::new_v4(),
            user_id,
            content: content.to_string(),
            source,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.ideas.push(idea.clone());
        Ok(idea)
    }

    async fn list_ideas(&self, user_id: Uuid) -> PortResult<Vec<Idea>> {
        let t = self.tables.read().await;
        Ok(t.ideas
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_idea(&self, user_id: Uuid, id: Uuid) -> PortResult<Idea> {
        let t = self.tables.read().await;
        t.ideas
            .iter()
            .find(|i| i.id == id && i.user_id == user_id)
            .cloned()
            .ok_or_else(|| not_found("Idea", id))
    }

    async fn update_idea(&self, user_id: Uuid, id: Uuid, patch: UpdateIdea) -> PortResult<Idea> {
        let mut t = self.tables.write().await;
        let row = t
            .ideas
            .iter_mut()
            .find(|i| i.id == id && i.user_id == user_id)
            .ok_or_else(|| not_found("Idea", id))?;
        if let Some(content) = patch.content {
            row.content = content;
        }
        if let Some(source) = patch.source {
            row.source = source;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_idea(&self, user_id: Uuid, id: Uuid) -> PortResult<()> {
        let mut t = self.tables.write().await;
        if !t.owns_idea(user_id, id) {
            return Err(not_found("Idea", id));
        }
        t.ideas.retain(|i| i.id != id);
        for task in t.tasks.iter_mut().filter(|task| task.idea_id == Some(id)) {
            task.idea_id = None;
        }
        for node in t.nodes.iter_mut().filter(|node| node.idea_id == Some(id)) {
            node.idea_id = None;
        }
        Ok(())
    }
}

//=========================================================================================
// Tasks
//=========================================================================================

#[async_trait]
impl TaskRepository for InMemoryDatabase {
    async fn create_task(&self, user_id: Uuid, dto: CreateTask) -> PortResult<Task> {
        let mut t = self.tables.write().await;
        t.require_idea(user_id, dto.idea_id)?;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            user_id,
            idea_id: dto.idea_id,
            title: dto.title,
            description: dto.description,
            status: dto.status,
            category: dto.category,
            due_date: dto.due_date,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        t.tasks.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, user_id: Uuid) -> PortResult<Vec<Task>> {
        let t = self.tables.read().await;
        Ok(t.tasks
            .iter()
            .rev()
            .filter(|task| task.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_task(&self, user_id: Uuid, id: Uuid) -> PortResult<Task> {
        let t = self.tables.read().await;
        t.tasks
            .iter()
            .find(|task| task.id == id && task.user_id == user_id)
            .cloned()
            .ok_or_else(|| not_found("Task", id))
    }

    async fn update_task(&self, user_id: Uuid, id: Uuid, patch: UpdateTask) -> PortResult<Task> {
        let mut t = self.tables.write().await;
        if !t.tasks.iter().any(|task| task.id == id && task.user_id == user_id) {
            return Err(not_found("Task", id));
        }
        if let Some(idea_id) = patch.idea_id {
            t.require_idea(user_id, idea_id)?;
        }
        let row = t
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| not_found("Task", id))?;
        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(description) = patch.description {
            row.description = description;
        }
        if let Some(status) = patch.status {
            row.status = status;
        }
        if let Some(category) = patch.category {
            row.category = category;
        }
        if let Some(due_date) = patch.due_date {
            row.due_date = due_date;
        }
        if let Some(idea_id) = patch.idea_id {
            row.idea_id = idea_id;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_task(&self, user_id: Uuid, id: Uuid) -> PortResult<()> {
        let mut t = self.tables.write().await;
        let before = t.tasks.len();
        t.tasks.retain(|task| !(task.id == id && task.user_id == user_id));
        if t.tasks.len() == before {
            return Err(not_found("Task", id));
        }
        Ok(())
    }
}

//=========================================================================================
// Canvases, Nodes and Connections
//=========================================================================================

#[async_trait]
impl CanvasRepository for InMemoryDatabase {
    async fn create_canvas(&self, user_id: Uuid, name: &str) -> PortResult<Canvas> {
        let now = Utc::now();
        let canvas = Canvas {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.canvases.push(canvas.clone());
        Ok(canvas)
    }

    async fn list_canvases(&self, user_id: Uuid) -> PortResult<Vec<Canvas>> {
        let t = self.tables.read().await;
        Ok(t.canvases
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_canvas(&self, user_id: Uuid, id: Uuid) -> PortResult<Canvas> {
        let t = self.tables.read().await;
        t.canvases
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned()
            .ok_or_else(|| not_found("Canvas", id))
    }

    async fn get_canvas_graph(&self, user_id: Uuid, id: Uuid) -> PortResult<CanvasGraph> {
        let t = self.tables.read().await;
        let canvas = t
            .canvases
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned()
            .ok_or_else(|| not_found("Canvas", id))?;
        Ok(CanvasGraph {
            canvas,
            nodes: t.nodes.iter().filter(|n| n.canvas_id == id).cloned().collect(),
            connections: t
                .connections
                .iter()
                .filter(|c| c.canvas_id == id)
                .cloned()
                .collect(),
        })
    }

    async fn rename_canvas(&self, user_id: Uuid, id: Uuid, name: &str) -> PortResult<Canvas> {
        let mut t = self.tables.write().await;
        let row = t
            .canvases
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
            .ok_or_else(|| not_found("Canvas", id))?;
        row.name = name.to_string();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_canvas(&self, user_id: Uuid, id: Uuid) -> PortResult<()> {
        let mut t = self.tables.write().await;
        t.require_canvas(user_id, id)?;
        t.canvases.retain(|c| c.id != id);
        t.nodes.retain(|n| n.canvas_id != id);
        t.connections.retain(|c| c.canvas_id != id);
        Ok(())
    }

    async fn create_node(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        dto: CreateCanvasNode,
    ) -> PortResult<CanvasNode> {
        let mut t = self.tables.write().await;
        t.require_canvas(user_id, canvas_id)?;
        t.require_idea(user_id, dto.idea_id)?;
        let now = Utc::now();
        let node = CanvasNode {
            id: Uuid::new_v4(),
            canvas_id,
            idea_id: dto.idea_id,
            x: dto.x,
            y: dto.y,
            width: dto.width,
            height: dto.height,
            content: dto.content,
            created_at: now,
            updated_at: now,
        };
        t.nodes.push(node.clone());
        Ok(node)
    }

    async fn list_nodes(&self, user_id: Uuid, canvas_id: Uuid) -> PortResult<Vec<CanvasNode>> {
        let t = self.tables.read().await;
        t.require_canvas(user_id, canvas_id)?;
        Ok(t.nodes
            .iter()
            .filter(|n| n.canvas_id == canvas_id)
            .cloned()
            .collect())
    }

    async fn get_node(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<CanvasNode> {
        let t = self.tables.read().await;
        if !t.owns_canvas(user_id, canvas_id) {
            return Err(not_found("Canvas node", id));
        }
        t.nodes
            .iter()
            .find(|n| n.id == id && n.canvas_id == canvas_id)
            .cloned()
            .ok_or_else(|| not_found("Canvas node", id))
    }

    async fn update_node(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
        patch: UpdateCanvasNode,
    ) -> PortResult<CanvasNode> {
        let mut t = self.tables.write().await;
        if !t.owns_canvas(user_id, canvas_id)
            || !t.nodes.iter().any(|n| n.id == id && n.canvas_id == canvas_id)
        {
            return Err(not_found("Canvas node", id));
        }
        if let Some(idea_id) = patch.idea_id {
            t.require_idea(user_id, idea_id)?;
        }
        let row = t
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| not_found("Canvas node", id))?;
        if let Some(x) = patch.x {
            row.x = x;
        }
        if let Some(y) = patch.y {
            row.y = y;
        }
        if let Some(width) = patch.width {
            row.width = width;
        }
        if let Some(height) = patch.height {
            row.height = height;
        }
        if let Some(content) = patch.content {
            row.content = content;
        }
        if let Some(idea_id) = patch.idea_id {
            row.idea_id = idea_id;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_node(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<()> {
        let mut t = self.tables.write().await;
        if !t.owns_canvas(user_id, canvas_id)
            || !t.nodes.iter().any(|n| n.id == id && n.canvas_id == canvas_id)
        {
            return Err(not_found("Canvas node", id));
        }
        t.nodes.retain(|n| n.id != id);
        t.connections
            .retain(|c| c.from_node_id != id && c.to_node_id != id);
        Ok(())
    }

    async fn create_connection(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        dto: CreateCanvasConnection,
    ) -> PortResult<CanvasConnection> {
        let mut t = self.tables.write().await;
        t.require_canvas(user_id, canvas_id)?;
        for node_id in [dto.from_node_id, dto.to_node_id] {
            if !t
                .nodes
                .iter()
                .any(|n| n.id == node_id && n.canvas_id == canvas_id)
            {
                return Err(not_found("Canvas node", node_id));
            }
        }
        let now = Utc::now();
        let connection = CanvasConnection {
            id: Uuid::new_v4(),
            canvas_id,
            from_node_id: dto.from_node_id,
            to_node_id: dto.to_node_id,
            label: dto.label,
            created_at: now,
            updated_at: now,
        };
        t.connections.push(connection.clone());
        Ok(connection)
    }

    async fn list_connections(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
    ) -> PortResult<Vec<CanvasConnection>> {
        let t = self.tables.read().await;
        t.require_canvas(user_id, canvas_id)?;
        Ok(t.connections
            .iter()
            .filter(|c| c.canvas_id == canvas_id)
            .cloned()
            .collect())
    }

    async fn get_connection(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
    ) -> PortResult<CanvasConnection> {
        let t = self.tables.read().await;
        if !t.owns_canvas(user_id, canvas_id) {
            return Err(not_found("Canvas connection", id));
        }
        t.connections
            .iter()
            .find(|c| c.id == id && c.canvas_id == canvas_id)
            .cloned()
            .ok_or_else(|| not_found("Canvas connection", id))
    }

    async fn update_connection(
        &self,
        user_id: Uuid,
        canvas_id: Uuid,
        id: Uuid,
        patch: UpdateCanvasConnection,
    ) -> PortResult<CanvasConnection> {
        let mut t = self.tables.write().await;
        if !t.owns_canvas(user_id, canvas_id) {
            return Err(not_found("Canvas connection", id));
        }
        let row = t
            .connections
            .iter_mut()
            .find(|c| c.id == id && c.canvas_id == canvas_id)
            .ok_or_else(|| not_found("Canvas connection", id))?;
        if let Some(label) = patch.label {
            row.label = label;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_connection(&self, user_id: Uuid, canvas_id: Uuid, id: Uuid) -> PortResult<()> {
        let mut t = self.tables.write().await;
        if !t.owns_canvas(user_id, canvas_id) {
            return Err(not_found("Canvas connection", id));
        }
        let before = t.connections.len();
        t.connections
            .retain(|c| !(c.id == id && c.canvas_id == canvas_id));
        if t.connections.len() == before {
            return Err(not_found("Canvas connection", id));
        }
        Ok(())
    }
}

//=========================================================================================
// Analytics
//=========================================================================================

#[async_trait]
impl AnalyticsRepository for InMemoryDatabase {
    async fn record_event(
        &self,
        user_id: Option<Uuid>,
        event_name: &str,
        metadata: Option<JsonValue>,
    ) -> PortResult<AnalyticsEvent> {
        let event = AnalyticsEvent {
            id: Uuid::new_v4(),
            user_id,
            event_name: event_name.to_string(),
            metadata,
            created_at: Utc::now(),
        };
        self.tables.write().await.events.push(event.clone());
        Ok(event)
    }

    async fn list_events(&self, user_id: Uuid) -> PortResult<Vec<AnalyticsEvent>> {
        let t = self.tables.read().await;
        Ok(t.events
            .iter()
            .rev()
            .filter(|e| e.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn count_events_by_name(&self, user_id: Uuid) -> PortResult<Vec<EventCount>> {
        let t = self.tables.read().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for event in t.events.iter().filter(|e| e.user_id == Some(user_id)) {
            *counts.entry(event.event_name.as_str()).or_default() += 1;
        }
        let mut rows: Vec<EventCount> = counts
            .into_iter()
            .map(|(name, count)| EventCount {
                event_name: name.to_string(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| name_order(&a.event_name, &b.event_name))
        });
        Ok(rows)
    }
}
