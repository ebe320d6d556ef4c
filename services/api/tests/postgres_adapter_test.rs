//! Runs against a real PostgreSQL instance named by `DATABASE_URL`.
//!
//! `cargo test -p ideaboard_api -- --ignored`

use api_lib::adapters::DbAdapter;
use ideaboard_core::domain::{
    CreateCanvasConnection, CreateCanvasNode, CreateTask, NewUser, TaskStatus,
    UpdateCanvasConnection, UpdateCanvasNode, UpdateCategory, UpdateProfile, UpdateTask,
};
use ideaboard_core::ports::{
    CanvasRepository, CategoryRepository, PortError, TaskRepository, UserRepository,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .unwrap()
}

async fn adapter() -> DbAdapter {
    let db = DbAdapter::new(pool().await);
    db.run_migrations().await.unwrap();
    db
}

async fn user(db: &DbAdapter) -> Uuid {
    db.create_user(NewUser {
        username: format!("pg-{}", Uuid::new_v4()),
        phone: None,
        nickname: None,
        password_hash: "not-a-real-hash".to_string(),
    })
    .await
    .unwrap()
    .id
}

fn node() -> CreateCanvasNode {
    CreateCanvasNode {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 80.0,
        content: None,
        idea_id: None,
    }
}

#[tokio::test]
#[ignore] // Requires database connection
async fn category_updates_are_owner_scoped() {
    let db = adapter().await;
    let owner = user(&db).await;
    let other = user(&db).await;
    let category = db.create_category(owner, "Work", "#ff0000").await.unwrap();

    let res = db
        .update_category(
            other,
            category.id,
            UpdateCategory {
                name: Some("Stolen".to_string()),
                color: None,
            },
        )
        .await;
    assert!(matches!(res, Err(PortError::NotFound(_))));

    let kept = db.get_category(owner, category.id).await.unwrap();
    assert_eq!(kept.name, "Work");
}

#[tokio::test]
#[ignore] // Requires database connection
async fn canvas_delete_cascades_to_the_graph() {
    let db = adapter().await;
    let owner = user(&db).await;
    let canvas = db.create_canvas(owner, "Board").await.unwrap();
    let a = db.create_node(owner, canvas.id, node()).await.unwrap();
    let b = db.create_node(owner, canvas.id, node()).await.unwrap();
    db.create_connection(
        owner,
        canvas.id,
        CreateCanvasConnection {
            from_node_id: a.id,
            to_node_id: b.id,
            label: None,
        },
    )
    .await
    .unwrap();

    let graph = db.get_canvas_graph(owner, canvas.id).await.unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.connections.len(), 1);

    db.delete_canvas(owner, canvas.id).await.unwrap();
    let res = db.get_node(owner, canvas.id, a.id).await;
    assert!(matches!(res, Err(PortError::NotFound(_))));
}

#[tokio::test]
#[ignore] // Requires database connection
async fn explicit_null_clears_and_absent_fields_are_kept() {
    let db = adapter().await;
    let owner = user(&db).await;

    let task = db
        .create_task(
            owner,
            CreateTask {
                title: "Draft".to_string(),
                description: Some("first pass".to_string()),
                status: TaskStatus::Todo,
                category: Some("Work".to_string()),
                due_date: None,
                idea_id: None,
            },
        )
        .await
        .unwrap();
    let task = db
        .update_task(
            owner,
            task.id,
            UpdateTask {
                description: Some(None),
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(task.description, None);
    assert_eq!(task.status, TaskStatus::Done);
    assert_eq!(task.title, "Draft");
    assert_eq!(task.category.as_deref(), Some("Work"));

    let canvas = db.create_canvas(owner, "Board").await.unwrap();
    let mut labelled = node();
    labelled.content = Some("note".to_string());
    let a = db.create_node(owner, canvas.id, labelled).await.unwrap();
    let b = db.create_node(owner, canvas.id, node()).await.unwrap();
    let a = db
        .update_node(
            owner,
            canvas.id,
            a.id,
            UpdateCanvasNode {
                content: Some(None),
                x: Some(42.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(a.content, None);
    assert_eq!(a.x, 42.0);
    assert_eq!(a.width, 100.0);

    let edge = db
        .create_connection(
            owner,
            canvas.id,
            CreateCanvasConnection {
                from_node_id: a.id,
                to_node_id: b.id,
                label: Some("then".to_string()),
            },
        )
        .await
        .unwrap();
    let untouched = db
        .update_connection(owner, canvas.id, edge.id, UpdateCanvasConnection::default())
        .await
        .unwrap();
    assert_eq!(untouched.label.as_deref(), Some("then"));
    let cleared = db
        .update_connection(
            owner,
            canvas.id,
            edge.id,
            UpdateCanvasConnection { label: Some(None) },
        )
        .await
        .unwrap();
    assert_eq!(cleared.label, None);

    let profile = db
        .update_user_profile(
            owner,
            UpdateProfile {
                nickname: Some(Some("Ada".to_string())),
                phone: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.nickname.as_deref(), Some("Ada"));
    let profile = db
        .update_user_profile(
            owner,
            UpdateProfile {
                nickname: Some(None),
                phone: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.nickname, None);
}

#[tokio::test]
#[ignore] // Requires database connection
async fn category_names_sort_without_regard_to_case() {
    let db = adapter().await;
    let owner = user(&db).await;
    for name in ["beta", "Alpha", "alpha", "Beta"] {
        db.create_category(owner, name, "#000").await.unwrap();
    }
    let names: Vec<_> = db
        .list_categories(owner)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "alpha", "Beta", "beta"]);
}

#[tokio::test]
#[ignore] // Requires database connection
async fn purge_removes_only_expired_sessions() {
    let db = adapter().await;
    let owner = user(&db).await;
    let stale = Uuid::new_v4().to_string();
    let live = Uuid::new_v4().to_string();
    db.create_auth_session(&stale, owner, chrono::Utc::now() - chrono::Duration::minutes(5))
        .await
        .unwrap();
    db.create_auth_session(&live, owner, chrono::Utc::now() + chrono::Duration::minutes(5))
        .await
        .unwrap();

    assert!(db.purge_expired_auth_sessions().await.unwrap() >= 1);
    assert_eq!(db.validate_auth_session(&live).await.unwrap(), owner);
    let leftover: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_sessions WHERE id = $1")
        .bind(&stale)
        .fetch_one(&pool().await)
        .await
        .unwrap();
    assert_eq!(leftover, 0);
}
