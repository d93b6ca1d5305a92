//! Integration tests for rqa-ks API endpoints
//!
//! Every test gets its own in-memory database, seeded unless noted.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rqa_ks::db::{create_schema, init_memory_database};
use rqa_ks::embedding::HashingEncoder;
use rqa_ks::topics::TOPIC_ANSWERS;
use rqa_ks::{build_router, AppState};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt; // for `oneshot`

async fn setup_app() -> Router {
    let encoder = HashingEncoder::default();
    let pool = init_memory_database(&encoder)
        .await
        .expect("Failed to create in-memory database");
    build_router(AppState::new(pool, encoder))
}

/// App over an empty (unseeded) database
async fn setup_empty_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    create_schema(&pool).await.expect("Schema creation failed");
    build_router(AppState::new(pool, HashingEncoder::default()))
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// GET /manual_search_get
// =============================================================================

#[tokio::test]
async fn test_search_get_topic_dictionary() {
    let app = setup_app().await;

    let (status, body) = call(
        &app,
        get_request("/manual_search_get?question=What%20is%20your%20return%20policy%3F"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["confidence"], 0.85);
    assert_eq!(body["source_type"], "manual");
    assert!(body["answer"].as_str().unwrap().contains("30 days"));
    assert!(body["metadata"]["processing_time_ms"].is_number());
}

#[tokio::test]
async fn test_search_get_general_help() {
    let app = setup_app().await;

    let (_, body) = call(&app, get_request("/manual_search_get?question=I%20need%20support")).await;
    assert_eq!(body["found"], true);
    assert_eq!(body["confidence"], 0.75);
    assert_eq!(body["metadata"]["id"], "general-help-1");
}

#[tokio::test]
async fn test_search_get_not_found() {
    let app = setup_empty_app().await;

    let (status, body) = call(
        &app,
        get_request("/manual_search_get?question=zebra%20xylophone%20quantum"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
    assert_eq!(body["answer"], "");
    assert_eq!(body["source_type"], "low_confidence");
    assert_eq!(body["confidence"], -0.1);
}

#[tokio::test]
async fn test_search_post_empty_table() {
    let app = setup_empty_app().await;

    let (status, body) = call(&app, post_json("/manual_search", &json!({ "question": "anything" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
    assert_eq!(body["source_type"], "none");
    assert_eq!(body["confidence"], 0.0);
}

#[tokio::test]
async fn test_search_get_missing_question_is_400() {
    let app = setup_app().await;
    let response = app.oneshot(get_request("/manual_search_get")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// POST /add_manual_knowledge + POST /manual_search
// =============================================================================

#[tokio::test]
async fn test_added_entry_is_searchable() {
    let app = setup_app().await;

    let (status, added) = call(
        &app,
        post_json(
            "/add_manual_knowledge",
            &json!({
                "question": "Do you offer gift wrapping for orders?",
                "answer": "Yes, gift wrapping is available at checkout for a small fee.",
                "confidence_score": 0.95,
                "brand": "Acme",
                "tags": ["gift", "wrapping"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["status"], "success");
    assert!(added["entry_id"].is_string());

    let (status, body) = call(
        &app,
        post_json(
            "/manual_search",
            &json!({ "question": "Do you offer gift wrapping for orders?" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(
        body["answer"],
        "Yes, gift wrapping is available at checkout for a small fee."
    );
    assert_eq!(body["source_type"], "real_time_manual");
    assert_eq!(body["metadata"]["brand"], "Acme");
    assert_eq!(body["metadata"]["id"], added["entry_id"]);

    let similarity = body["metadata"]["similarity_score"].as_f64().unwrap();
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((confidence - (similarity + 0.95) / 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_add_requires_question_and_answer() {
    let app = setup_app().await;

    for body in [
        json!({ "question": "", "answer": "something" }),
        json!({ "question": "something", "answer": "  " }),
        json!({ "answer": "no question" }),
    ] {
        let (status, error) = call(&app, post_json("/add_manual_knowledge", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(error["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_vector_search_finds_seeded_entry() {
    let app = setup_app().await;

    // No dictionary routing on the POST endpoint
    let (_, body) = call(
        &app,
        post_json("/manual_search", &json!({ "question": "What payment methods do you accept?" })),
    )
    .await;
    assert_eq!(body["found"], true);
    assert!(body["answer"].as_str().unwrap().contains("PayPal"));
    assert_eq!(body["metadata"]["stored_confidence"], 0.92);
}

// =============================================================================
// POST /log_interaction, GET /stats, GET /health
// =============================================================================

#[tokio::test]
async fn test_log_interaction_counts_in_stats() {
    let app = setup_app().await;

    for (source, confidence) in [("manual_knowledge", 0.9), ("fallback", 0.1)] {
        let (status, body) = call(
            &app,
            post_json(
                "/log_interaction",
                &json!({
                    "query": "How long does shipping take?",
                    "answer": "3-5 business days",
                    "source": source,
                    "confidence": confidence,
                    "timestamp": "2024-05-01T12:00:00Z"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert!(body["log_id"].is_string());
    }

    let (status, stats) = call(&app, get_request("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["interactions"]["total_queries"], 2);
    assert_eq!(stats["interactions"]["sources_used"]["fallback"], 1);
    assert!((stats["interactions"]["avg_confidence"].as_f64().unwrap() - 0.5).abs() < 1e-9);
    assert_eq!(stats["knowledge"]["total_entries"], TOPIC_ANSWERS.len());
    assert_eq!(stats["knowledge"]["source_types"]["manual"], TOPIC_ANSWERS.len());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let (status, body) = call(&app, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "rqa-ks");
    assert_eq!(body["knowledge_entries"], TOPIC_ANSWERS.len());
    assert_eq!(body["logged_interactions"], 0);
    assert_eq!(body["embedding_model"], "sha256-feature-hashing-384");
}

// =============================================================================
// POST /validate_answer
// =============================================================================

#[tokio::test]
async fn test_basic_validation() {
    let app = setup_app().await;

    let (status, body) = call(
        &app,
        post_json(
            "/validate_answer",
            &json!({
                "question": "how long is shipping",
                "answer": "shipping is 3-5 business days for standard orders and next day for express orders placed early",
                "source": "manual_knowledge"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], true);
    assert_eq!(body["accuracy_score"], 0.5);
    assert_eq!(body["completeness_score"], 0.94);
    assert_eq!(body["confidence_boost"], 0.9);
}
