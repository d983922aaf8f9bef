//! Integration tests for the health and metrics endpoints.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use animecat::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn spawn_app_with_db(database_path: String) -> Router {
    let root = std::env::temp_dir().join(format!("animecat-system-test-{}", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = database_path;
    config.server.uploads_path = root.join("uploads").display().to_string();
    config.server.public_path = root.join("public").display().to_string();

    let state = animecat::api::create_app_state_from_config(config, None)
        .expect("Failed to create app state");

    animecat::api::router(state)
}

fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("animecat-system-test-{}.db", uuid::Uuid::new_v4()));
    spawn_app_with_db(format!("sqlite:{}", db_path.display()))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
}

#[tokio::test]
async fn test_health_live() {
    let (status, body) = get_json(spawn_app(), "/health/live").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "alive");
}

#[tokio::test]
async fn test_health_ready() {
    let (status, body) = get_json(spawn_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "connected");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    // a regular file where the database directory should be
    let blocker =
        std::env::temp_dir().join(format!("animecat-system-blocker-{}", uuid::Uuid::new_v4()));
    std::fs::write(&blocker, b"not a directory").unwrap();
    let db_path = blocker.join("nested").join("catalog.db");

    let app = spawn_app_with_db(format!("sqlite:{}", db_path.display()));
    let (status, body) = get_json(app.clone(), "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["data"]["database"], "unreachable");

    let (status, body) = get_json(app, "/animeForm").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Something went wrong with the server.");
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = spawn_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
