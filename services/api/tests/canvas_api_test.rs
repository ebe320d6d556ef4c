mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{send, signup, test_app};
use serde_json::{json, Value};

async fn create(app: &Router, cookie: &str, uri: &str, body: Value) -> Value {
    let res = send(app, Method::POST, uri, Some(cookie), Some(body)).await;
    assert_eq!(res.status, StatusCode::CREATED, "POST {uri}: {}", res.body);
    res.body
}

fn id(row: &Value) -> &str {
    row["id"].as_str().unwrap()
}

fn node_at(x: f64, y: f64) -> Value {
    json!({ "x": x, "y": y, "width": 200.0, "height": 120.0 })
}

#[tokio::test]
async fn graph_contains_nodes_and_connections() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;

    let canvas = create(&app, &cookie, "/canvases", json!({ "name": "Roadmap" })).await;
    let base = format!("/canvases/{}", id(&canvas));
    let a = create(&app, &cookie, &format!("{base}/nodes"), node_at(0.0, 0.0)).await;
    let b = create(&app, &cookie, &format!("{base}/nodes"), node_at(300.0, 0.0)).await;
    let edge = create(
        &app,
        &cookie,
        &format!("{base}/connections"),
        json!({ "fromNodeId": id(&a), "toNodeId": id(&b), "label": "then" }),
    )
    .await;
    assert_eq!(edge["canvasId"], canvas["id"]);

    let graph = send(&app, Method::GET, &format!("{base}/graph"), Some(&cookie), None).await;
    assert_eq!(graph.status, StatusCode::OK);
    assert_eq!(graph.body["data"]["canvas"]["name"], "Roadmap");
    assert_eq!(graph.body["data"]["nodes"].as_array().unwrap().len(), 2);
    let connections = graph.body["data"]["connections"].as_array().unwrap();
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0]["label"], "then");
}

#[tokio::test]
async fn moving_a_node_keeps_its_size() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;
    let canvas = create(&app, &cookie, "/canvases", json!({ "name": "Board" })).await;
    let node = create(
        &app,
        &cookie,
        &format!("/canvases/{}/nodes", id(&canvas)),
        node_at(10.0, 20.0),
    )
    .await;

    let moved = send(
        &app,
        Method::PATCH,
        &format!("/canvases/{}/nodes/{}", id(&canvas), id(&node)),
        Some(&cookie),
        Some(json!({ "x": 50.5, "y": -4.0 })),
    )
    .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.body["data"]["x"], 50.5);
    assert_eq!(moved.body["data"]["y"], -4.0);
    assert_eq!(moved.body["data"]["width"], 200.0);
}

#[tokio::test]
async fn connections_cannot_cross_canvases() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;
    let first = create(&app, &cookie, "/canvases", json!({ "name": "One" })).await;
    let second = create(&app, &cookie, "/canvases", json!({ "name": "Two" })).await;
    let a = create(&app, &cookie, &format!("/canvases/{}/nodes", id(&first)), node_at(0.0, 0.0)).await;
    let b = create(&app, &cookie, &format!("/canvases/{}/nodes", id(&second)), node_at(0.0, 0.0)).await;

    let res = send(
        &app,
        Method::POST,
        &format!("/canvases/{}/connections", id(&first)),
        Some(&cookie),
        Some(json!({ "fromNodeId": id(&a), "toNodeId": id(&b) })),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let self_loop = send(
        &app,
        Method::POST,
        &format!("/canvases/{}/connections", id(&first)),
        Some(&cookie),
        Some(json!({ "fromNodeId": id(&a), "toNodeId": id(&a) })),
    )
    .await;
    assert_eq!(self_loop.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_canvas_removes_its_nodes() {
    let app = test_app();
    let cookie = signup(&app, "ada").await;
    let canvas = create(&app, &cookie, "/canvases", json!({ "name": "Scratch" })).await;
    let base = format!("/canvases/{}", id(&canvas));
    let node = create(&app, &cookie, &format!("{base}/nodes"), node_at(0.0, 0.0)).await;

    let deleted = send(&app, Method::DELETE, &base, Some(&cookie), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "画布已删除");

    let node_uri = format!("{base}/nodes/{}", id(&node));
    let gone = send(&app, Method::GET, &node_uri, Some(&cookie), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn foreign_canvases_are_not_found() {
    let app = test_app();
    let owner = signup(&app, "ada").await;
    let intruder = signup(&app, "eve").await;
    let canvas = create(&app, &owner, "/canvases", json!({ "name": "Private" })).await;
    let base = format!("/canvases/{}", id(&canvas));

    for uri in [base.clone(), format!("{base}/graph"), format!("{base}/nodes")] {
        let res = send(&app, Method::GET, &uri, Some(&intruder), None).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{uri}");
    }
    let res = send(
        &app,
        Method::POST,
        &format!("{base}/nodes"),
        Some(&intruder),
        Some(node_at(0.0, 0.0)),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
