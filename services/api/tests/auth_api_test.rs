mod common;

use axum::http::{Method, StatusCode};
use common::{cookie_pair, send, signup, test_app};
use serde_json::json;

#[tokio::test]
async fn signup_sets_an_http_only_session_cookie() {
    let app = test_app();
    let res = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "username": "ada", "password": "correct horse", "nickname": "Ada" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["username"], "ada");
    assert_eq!(res.body["nickname"], "Ada");
    assert!(res.body.get("passwordHash").is_none());
    let cookie = res.set_cookie.unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let app = test_app();
    signup(&app, "ada").await;
    let res = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "username": "ada", "password": "another password" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(res.body["error"].is_string());
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = test_app();
    let res = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "username": "ada", "password": "short" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test_app();
    signup(&app, "ada").await;
    let res = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "ada", "password": "wrong password" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Unauthorized");
}

#[tokio::test]
async fn login_issues_a_working_session() {
    let app = test_app();
    signup(&app, "ada").await;
    let res = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "ada", "password": "correct horse" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    let cookie = cookie_pair(&res.set_cookie.unwrap());

    let me = send(&app, Method::GET, "/users/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "ada");
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;

    let res = send(&app, Method::POST, "/auth/logout", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.set_cookie.unwrap().contains("Max-Age=0"));

    let me = send(&app, Method::GET, "/users/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_can_clear_the_phone() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;

    let set = send(
        &app,
        Method::PATCH,
        "/users/me",
        Some(&cookie),
        Some(json!({ "phone": "5550100", "nickname": "Ada" })),
    )
    .await;
    assert_eq!(set.status, StatusCode::OK);
    assert_eq!(set.body["data"]["phone"], "5550100");

    let cleared = send(
        &app,
        Method::PATCH,
        "/users/me",
        Some(&cookie),
        Some(json!({ "phone": null })),
    )
    .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert!(cleared.body["data"]["phone"].is_null());
    assert_eq!(cleared.body["data"]["nickname"], "Ada");
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = test_app();
    for uri in ["/users/me", "/categories", "/ideas", "/tasks", "/canvases"] {
        let res = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{uri}");
    }
    let forged = send(&app, Method::GET, "/ideas", Some("session=forged"), None).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();
    let res = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
}
