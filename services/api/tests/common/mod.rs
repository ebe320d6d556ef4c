//! Shared helpers for driving the full router in-process.

#![allow(dead_code)]

use api_lib::{
    adapters::InMemoryDatabase,
    config::{Config, StorageBackend},
    web::{create_router, state::AppState},
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        storage: StorageBackend::Memory,
        db_max_connections: 1,
        log_level: tracing::Level::INFO,
        cors_origin: "http://localhost:3000".to_string(),
        session_ttl_days: 30,
        cookie_secure: false,
    }
}

/// A fresh application backed by empty in-memory tables.
pub fn test_app() -> Router {
    let state = AppState::new(Arc::new(InMemoryDatabase::new()), Arc::new(test_config()));
    create_router(Arc::new(state)).unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

/// Sends one request; `cookie` is sent verbatim in the `Cookie` header.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        set_cookie,
        body,
    }
}

/// Turns a `Set-Cookie` header into the `name=value` pair a browser sends back.
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}

/// Signs up a fresh user and returns the session cookie to send with later requests.
pub async fn signup(app: &Router, username: &str) -> String {
    let res = send(
        app,
        Method::POST,
        "/auth/signup",
        None,
        Some(serde_json::json!({ "username": username, "password": "correct horse" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "signup failed: {}", res.body);
    cookie_pair(&res.set_cookie.expect("signup sets the session cookie"))
}
