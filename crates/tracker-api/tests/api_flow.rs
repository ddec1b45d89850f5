//! End-to-end tests driving the router over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use database::Database;
use gemini_relay::{async_trait, AiRelay, RelayError, TextGenerator, NOT_CONFIGURED_MESSAGE};
use serde_json::{json, Value};
use tracker_api::{AppState, CorsOrigins};

struct CannedGenerator;

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, RelayError> {
        Ok(format!("echo: {}", prompt))
    }

    fn name(&self) -> &str {
        "canned"
    }
}

async fn spawn_app(relay: AiRelay) -> SocketAddr {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();

    let app = tracker_api::app(AppState::new(db, relay), &CorsOrigins::Any);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn post_json(addr: SocketAddr, path: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{}{}", addr, path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

async fn get_json(addr: SocketAddr, path: &str) -> (u16, Value) {
    let response = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_track_then_summarize() {
    let addr = spawn_app(AiRelay::unavailable()).await;

    let (status, body) = post_json(
        addr,
        "/api/track/activity",
        json!({
            "activity_type": "page_visit",
            "user_id": "u1",
            "session_id": "s1",
            "url": "https://a.test/x",
            "page_title": "X"
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["user_id"], "u1");
    assert_eq!(body["session_id"], "s1");
    assert!(!body["activity_id"].as_str().unwrap().is_empty());

    let (status, body) = get_json(addr, "/api/track/summary/u1").await;
    assert_eq!(status, 200);
    let summary = &body["summary"];
    assert_eq!(summary["total_pages"], 1);
    assert_eq!(summary["total_interactions"], 1);
    assert_eq!(summary["unique_domains"], 1);
    assert_eq!(summary["domains_visited"], json!({ "a.test": 1 }));
    assert_eq!(summary["activity_breakdown"], json!({ "page_visit": 1 }));
    assert_eq!(summary["daily_session"]["chat_messages"], 0);
}

#[tokio::test]
async fn test_missing_activity_type_is_rejected() {
    let addr = spawn_app(AiRelay::unavailable()).await;

    let (status, body) = post_json(
        addr,
        "/api/track/activity",
        json!({ "user_id": "u1", "session_id": "s1", "url": "https://a.test/" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Activity type is required");

    let (status, body) = get_json(addr, "/api/debug/db-status").await;
    assert_eq!(status, 200);
    assert_eq!(
        body["counts"],
        json!({ "users": 0, "activities": 0, "sessions": 0, "chat_messages": 0 })
    );
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let addr = spawn_app(AiRelay::unavailable()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/track/activity", addr))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_summary_rejects_bad_date() {
    let addr = spawn_app(AiRelay::unavailable()).await;

    let (status, body) = get_json(addr, "/api/track/summary/u1?date=yesterday").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid date"));

    let (status, body) = get_json(addr, "/api/track/summary/u1?date=2026-03-01").await;
    assert_eq!(status, 200);
    assert_eq!(body["summary"]["date"], "2026-03-01");
    assert_eq!(body["summary"]["total_interactions"], 0);
    assert!(body["summary"]["daily_session"].is_null());
}

#[tokio::test]
async fn test_query_rejection_is_json() {
    let addr = spawn_app(AiRelay::unavailable()).await;

    let (status, body) =
        get_json(addr, "/api/track/summary/u1?date=2026-03-01&date=2026-03-02").await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());

    let (status, body) = get_json(addr, "/api/chat/history/u1?limit=many").await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_chat_without_key_counts_message() {
    let addr = spawn_app(AiRelay::unavailable()).await;

    post_json(
        addr,
        "/api/track/activity",
        json!({ "activity_type": "click", "user_id": "u1", "session_id": "s1" }),
    )
    .await;

    let (status, body) = post_json(
        addr,
        "/api/chat/send",
        json!({ "message": "hello", "user_id": "u1", "session_id": "s1" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], NOT_CONFIGURED_MESSAGE);

    let (_, body) = get_json(addr, "/api/track/summary/u1").await;
    assert_eq!(body["summary"]["daily_session"]["chat_messages"], 1);

    let (status, body) = get_json(addr, "/api/chat/history/u1").await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 1);
    assert_eq!(body["messages"][0]["message"], "hello");
    assert_eq!(body["messages"][0]["response"], NOT_CONFIGURED_MESSAGE);
    assert_eq!(body["messages"][0]["session_id"], "s1");

    let (status, body) = post_json(addr, "/api/chat/send", json!({ "message": "  " })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Message is required");

    let (_, body) = get_json(addr, "/api/chat/history/u1").await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_chat_uses_generator() {
    let addr = spawn_app(AiRelay::with_generator(Arc::new(CannedGenerator))).await;

    let (status, body) = post_json(
        addr,
        "/api/chat/send",
        json!({ "message": "hi", "include_context": false }),
    )
    .await;
    assert_eq!(status, 200);
    let reply = body["response"].as_str().unwrap();
    assert!(reply.starts_with("echo: User question: hi"));
    assert!(!reply.contains("browsing activity"));

    let (_, body) = get_json(addr, "/api/health").await;
    assert_eq!(body["gemini_ai"], "configured");
}

#[tokio::test]
async fn test_health_and_debug_user_data() {
    let addr = spawn_app(AiRelay::unavailable()).await;

    let (status, body) = get_json(addr, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["gemini_ai"], "not_configured");
    assert_eq!(body["endpoints"]["history"], "/api/chat/history/<user_id>");

    let (status, body) = get_json(addr, "/api/debug/user-data/ghost").await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["user_exists"], false);

    post_json(
        addr,
        "/api/track/activity",
        json!({ "activity_type": "page_visit", "user_id": "u2", "url": "https://b.test/" }),
    )
    .await;

    let (status, body) = get_json(addr, "/api/debug/user-data/u2").await;
    assert_eq!(status, 200);
    assert_eq!(body["user"]["user_id"], "u2");
    assert_eq!(body["activities_count"], 1);
    assert_eq!(body["sessions_count"], 1);
    assert_eq!(body["activities"][0]["domain"], "b.test");
}
