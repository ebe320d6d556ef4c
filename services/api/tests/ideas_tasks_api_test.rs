mod common;

use axum::http::{Method, StatusCode};
use common::{send, signup, test_app};
use serde_json::json;

#[tokio::test]
async fn task_defaults_to_todo_and_links_an_idea() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;

    let idea = send(
        &app,
        Method::POST,
        "/ideas",
        Some(&cookie),
        Some(json!({ "content": "Ship the beta", "source": { "kind": "voice" } })),
    )
    .await;
    assert_eq!(idea.status, StatusCode::CREATED);
    assert_eq!(idea.body["source"]["kind"], "voice");
    let idea_id = idea.body["id"].as_str().unwrap().to_string();

    let task = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&cookie),
        Some(json!({ "title": "Write release notes", "ideaId": idea_id })),
    )
    .await;
    assert_eq!(task.status, StatusCode::CREATED);
    assert_eq!(task.body["status"], "todo");
    assert_eq!(task.body["ideaId"], idea_id.as_str());

    let uri = format!("/tasks/{}", task.body["id"].as_str().unwrap());
    let started = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&cookie),
        Some(json!({ "status": "in_progress", "ideaId": null })),
    )
    .await;
    assert_eq!(started.status, StatusCode::OK);
    assert_eq!(started.body["data"]["status"], "in_progress");
    assert!(started.body["data"]["ideaId"].is_null());
    assert_eq!(started.body["data"]["title"], "Write release notes");
}

#[tokio::test]
async fn deleting_an_idea_unlinks_its_tasks() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;
    let idea = send(&app, Method::POST, "/ideas", Some(&cookie), Some(json!({ "content": "Rewrite docs" }))).await;
    let idea_uri = format!("/ideas/{}", idea.body["id"].as_str().unwrap());
    let task = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&cookie),
        Some(json!({ "title": "Outline", "ideaId": idea.body["id"] })),
    )
    .await;

    let deleted = send(&app, Method::DELETE, &idea_uri, Some(&cookie), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "想法已删除");

    let task_uri = format!("/tasks/{}", task.body["id"].as_str().unwrap());
    let kept = send(&app, Method::GET, &task_uri, Some(&cookie), None).await;
    assert_eq!(kept.status, StatusCode::OK);
    assert!(kept.body["ideaId"].is_null());
}

#[tokio::test]
async fn tasks_cannot_link_someone_elses_idea() {
    let app = test_app();
    let owner = signup(&app, "ada").await;
    let intruder = signup(&app, "eve").await;
    let idea = send(&app, Method::POST, "/ideas", Some(&owner), Some(json!({ "content": "Secret plan" }))).await;

    let res = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&intruder),
        Some(json!({ "title": "Steal it", "ideaId": idea.body["id"] })),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;
    let res = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&cookie),
        Some(json!({ "title": "Broken", "status": "someday" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}
