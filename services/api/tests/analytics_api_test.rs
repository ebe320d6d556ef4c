mod common;

use axum::http::{Method, StatusCode};
use common::{send, signup, test_app};
use serde_json::json;

#[tokio::test]
async fn anonymous_events_are_recorded_unowned() {
    let app = test_app();
    let res = send(
        &app,
        Method::POST,
        "/analytics/events",
        None,
        Some(json!({ "eventName": "landing_view" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.body["userId"].is_null());
}

#[tokio::test]
async fn summary_counts_the_callers_events() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;
    for name in ["idea_created", "idea_created", "task_done"] {
        let res = send(
            &app,
            Method::POST,
            "/analytics/events",
            Some(&cookie),
            Some(json!({ "eventName": name, "metadata": { "source": "test" } })),
        )
        .await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert!(res.body["userId"].is_string());
    }

    let summary = send(&app, Method::GET, "/analytics/summary", Some(&cookie), None).await;
    assert_eq!(summary.status, StatusCode::OK);
    assert_eq!(
        summary.body["data"],
        json!([
            { "eventName": "idea_created", "count": 2 },
            { "eventName": "task_done", "count": 1 }
        ])
    );

    let events = send(&app, Method::GET, "/analytics/events", Some(&cookie), None).await;
    assert_eq!(events.body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn reading_events_requires_a_session() {
    let app = test_app();
    let res = send(&app, Method::GET, "/analytics/events", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    let res = send(&app, Method::GET, "/analytics/summary", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}
