//! services/api/src/adapters/db/mod.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the storage ports from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Ownership is enforced inside each statement (`WHERE id = $1 AND user_id = $2`,
//! or an `EXISTS` on the owning canvas) so a check and its mutation can never
//! interleave with another request.

mod analytics;
mod canvases;
mod categories;
mod ideas;
mod tasks;
mod users;

use ideaboard_core::ports::PortError;
use sqlx::PgPool;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the storage ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// Error Mapping
//=========================================================================================

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Maps a failed INSERT/UPDATE, turning unique violations into `Conflict`.
fn write_error(e: sqlx::Error, conflict_message: &str) -> PortError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            PortError::Conflict(conflict_message.to_string())
        }
        _ => unexpected(e),
    }
}

fn not_found(kind: &str, id: Uuid) -> PortError {
    PortError::NotFound(format!("{} {} not found", kind, id))
}

/// Fails with `NotFound` unless `idea_id` is one of the user's ideas. Inside a
/// transaction the row stays locked against deletion until commit.
async fn require_idea<'e, E>(executor: E, user_id: Uuid, idea_id: Uuid) -> Result<(), PortError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM ideas WHERE id = $1 AND user_id = $2 FOR SHARE")
            .bind(idea_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
            .map_err(unexpected)?;
    if row.is_some() {
        Ok(())
    } else {
        Err(not_found("Idea", idea_id))
    }
}

/// Fails with `NotFound` unless `canvas_id` is one of the user's canvases.
async fn require_canvas<'e, E>(executor: E, user_id: Uuid, canvas_id: Uuid) -> Result<(), PortError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM canvases WHERE id = $1 AND user_id = $2 FOR SHARE")
            .bind(canvas_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
            .map_err(unexpected)?;
    if row.is_some() {
        Ok(())
    } else {
        Err(not_found("Canvas", canvas_id))
    }
}
