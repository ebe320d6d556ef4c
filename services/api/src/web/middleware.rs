//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use ideaboard_core::ports::PortError;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// The signed-in caller, inserted into request extensions by [`require_auth`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// The caller if one is signed in, inserted by [`attach_user`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaybeUser(pub Option<Uuid>);

/// Pulls the session id out of the `Cookie` header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
}

/// Middleware that validates the auth session cookie and extracts the user id.
///
/// If valid, inserts an [`AuthUser`] into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session_id = session_id_from_headers(req.headers()).ok_or(PortError::Unauthorized)?;

    let user_id = state.users.authenticate(session_id).await.map_err(|e| {
        if !matches!(e, PortError::Unauthorized) {
            error!("Failed to validate auth session: {:?}", e);
        }
        e
    })?;

    req.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(req).await)
}

/// Like [`require_auth`] but lets anonymous requests through.
pub async fn attach_user(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let user_id = match session_id_from_headers(req.headers()) {
        Some(session_id) => match state.users.authenticate(session_id).await {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                debug!("Ignoring unusable session cookie: {:?}", e);
                None
            }
        },
        None => None,
    };
    req.extensions_mut().insert(MaybeUser(user_id));
    next.run(req).await
}
