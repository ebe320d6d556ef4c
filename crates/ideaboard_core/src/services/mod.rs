//! crates/ideaboard_core/src/services/mod.rs
//!
//! One service per entity group. Each service owns a handle to the storage
//! port and exposes create / find_all / find_one / update / remove, all scoped
//! by the calling user's id.

pub mod analytics;
pub mod canvas_connections;
pub mod canvas_nodes;
pub mod canvases;
pub mod categories;
pub mod ideas;
pub mod tasks;
pub mod users;

pub use analytics::AnalyticsService;
pub use canvas_connections::CanvasConnectionsService;
pub use canvas_nodes::CanvasNodesService;
pub use canvases::CanvasesService;
pub use categories::CategoriesService;
pub use ideas::IdeasService;
pub use tasks::TasksService;
pub use users::UsersService;

use crate::ports::{PortError, PortResult};

/// Rejects empty or whitespace-only text and returns it trimmed.
pub(crate) fn require_text(field: &str, value: &str) -> PortResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PortError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims() {
        assert_eq!(require_text("name", "  Work ").unwrap(), "Work");
    }

    #[test]
    fn require_text_rejects_blank() {
        assert_eq!(
            require_text("name", "   "),
            Err(PortError::InvalidInput("name must not be empty".into()))
        );
    }
}
