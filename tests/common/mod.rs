// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;
use wordnet::config::Config;
use wordnet::db::WordDb;
use wordnet::models::WordNode;
use wordnet::routes::create_router;
use wordnet::services::ReviewSessions;
use wordnet::AppState;

/// Fresh in-memory store with migrations applied.
#[allow(dead_code)]
pub async fn test_db() -> WordDb {
    WordDb::open_in_memory()
        .await
        .expect("Failed to open in-memory database")
}

/// Create a test app backed by an in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db: test_db().await,
        sessions: ReviewSessions::new(),
    });

    (create_router(state.clone()), state)
}

/// Insert a word with the given morphemes directly into the store.
#[allow(dead_code)]
pub async fn add_word(db: &WordDb, word: &str, meaning: &str, morphemes: &[&str], now: i64) {
    let morphemes: Vec<String> = morphemes.iter().map(|m| m.to_string()).collect();
    let node = WordNode::with_details(word, meaning, &morphemes, now);
    db.insert_word(&node, now)
        .await
        .expect("Failed to insert word");
}

/// Send a request with an optional JSON body and return status and parsed body.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
