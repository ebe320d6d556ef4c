//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login and logout, plus the
//! signed-in user's own profile.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use ideaboard_core::domain::{
    AuthSession, DataEnvelope, LoginRequest, SignupRequest, UpdateProfile, User,
};
use std::sync::Arc;

use crate::config::Config;
use crate::error::ApiError;
use crate::web::middleware::{session_id_from_headers, AuthUser, SESSION_COOKIE};
use crate::web::state::AppState;

//=========================================================================================
// Cookies
//=========================================================================================

fn session_cookie(config: &Config, value: &str, max_age_secs: i64) -> String {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly{}; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, value, secure, max_age_secs
    )
}

fn login_cookie(state: &AppState, session: &AuthSession) -> String {
    session_cookie(
        &state.config,
        &session.id,
        state.users.session_ttl().num_seconds(),
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created and signed in", body = User),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username or phone already registered")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, session) = state.users.signup(req).await?;
    let cookie = login_cookie(&state, &session);
    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(user)))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = User),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, session) = state.users.login(req).await?;
    let cookie = login_cookie(&state, &session);
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(user)))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let session_id =
        session_id_from_headers(&headers).ok_or(ideaboard_core::PortError::Unauthorized)?;
    state.users.logout(session_id).await?;

    let cookie = session_cookie(&state.config, "", 0);
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

/// GET /users/me - The signed-in user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.me(user_id).await?))
}

/// PATCH /users/me - Change nickname or phone
#[utoipa::path(
    patch,
    path = "/users/me",
    tag = "users",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Updated user, wrapped in `data`", body = User),
        (status = 409, description = "Phone already registered")
    )
)]
pub async fn update_me_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(patch): Json<UpdateProfile>,
) -> Result<Json<DataEnvelope<User>>, ApiError> {
    let user = state.users.update_profile(user_id, patch).await?;
    Ok(Json(DataEnvelope::new(user)))
}
