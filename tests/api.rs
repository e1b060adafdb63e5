//! Integration tests for the REST API.
//! Binds the real router on a random port and talks HTTP with reqwest.
//! Only paths that need no upstream (model / instruction document) are
//! exercised here; the crawler and store have their own unit tests.

use std::sync::Arc;

use scoutd::{config::Config, rest, AppContext};

/// Find a free local port by binding to port 0.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn spawn_server() -> String {
    let port = find_free_port();
    let config = Config::new(
        Some(port),
        Some("127.0.0.1".to_string()),
        "sk-test".to_string(),
        None,
        // Unreachable on purpose: no test below should get this far.
        "http://127.0.0.1:9/main-prompt".to_string(),
        "http://127.0.0.1:9/followup-prompt".to_string(),
        None,
        None,
    );
    let ctx: Arc<AppContext> = AppContext::new(config).unwrap();

    let router = rest::build_router(ctx);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn ping_reports_alive_and_session_count() {
    let base = spawn_server().await;
    let resp = reqwest::get(format!("{base}/ping")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "alive");
    assert_eq!(body["sessions"], 0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn analyze_without_site_url_is_400() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/analyze"))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("site_url"));
}

#[tokio::test]
async fn followup_with_unknown_session_is_404() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/followup"))
        .json(&serde_json::json!({
            "session_id": "no-such-session",
            "followup_prompt": "shorter please",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn followup_without_prompt_is_400() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/followup"))
        .json(&serde_json::json!({ "session_id": "whatever" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn clear_chat_with_unknown_session_is_404() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/clear-chat"))
        .json(&serde_json::json!({ "session_id": "missing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}
