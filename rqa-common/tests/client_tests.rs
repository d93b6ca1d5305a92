//! Knowledge store client tests against a local axum server

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use rqa_common::{Error, KnowledgeStoreClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Spawn `app` on an ephemeral port, returning its base URL
async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn echo_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let question = params.get("question").cloned().unwrap_or_default();
    Json(json!({
        "found": true,
        "answer": format!("echo: {}", question),
        "confidence": 0.9,
        "source_type": "manual",
        "metadata": {}
    }))
}

#[tokio::test]
async fn test_search_encodes_question() {
    let app = Router::new().route("/manual_search_get", get(echo_search));
    let base = spawn_server(app).await;

    let client = KnowledgeStoreClient::new(&base, Duration::from_secs(3)).unwrap();
    let result = client.search("what & why? 100%").await.unwrap();

    assert!(result.found);
    assert_eq!(result.answer, "echo: what & why? 100%");
}

#[tokio::test]
async fn test_search_non_success_is_error() {
    let app = Router::new().route(
        "/manual_search_get",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_server(app).await;

    let client = KnowledgeStoreClient::new(&base, Duration::from_secs(3)).unwrap();
    let err = client.search("anything").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_search_partial_body_defaults() {
    let app = Router::new().route(
        "/manual_search_get",
        get(|| async { Json(json!({ "found": false })) }),
    );
    let base = spawn_server(app).await;

    let client = KnowledgeStoreClient::new(&base, Duration::from_secs(3)).unwrap();
    let result = client.search("anything").await.unwrap();
    assert!(!result.found);
    assert!(result.answer.is_empty());
}

#[tokio::test]
async fn test_search_times_out() {
    let app = Router::new().route(
        "/manual_search_get",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "found": true, "answer": "too late" }))
        }),
    );
    let base = spawn_server(app).await;

    let client = KnowledgeStoreClient::new(&base, Duration::from_millis(200)).unwrap();
    let err = client.search("anything").await.unwrap_err();
    assert!(err.to_string().contains("timed out"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_health_unreachable_is_error() {
    // Bind then drop to get a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        KnowledgeStoreClient::new(&format!("http://{}", addr), Duration::from_secs(1)).unwrap();
    assert!(client.health().await.is_err());
}
