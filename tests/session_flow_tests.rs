// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review session flow tests.

use axum::http::{Method, StatusCode};
use serde_json::json;
use wordnet::services::{ReviewSessions, ReviewState, SessionError};
use wordnet::time_utils::now_millis;

mod common;

use common::send;

#[tokio::test]
async fn test_session_without_due_words_completes() {
    let (app, _state) = common::create_test_app().await;

    let (status, body) = send(&app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["state"], "completed");
    assert!(body["card"].is_null());
}

#[tokio::test]
async fn test_full_session_flow() {
    let (app, state) = common::create_test_app().await;
    common::add_word(&state.db, "export", "出口", &["ex", "port"], 0).await;
    common::add_word(&state.db, "import", "进口", &["im", "port"], 1).await;

    let (status, body) = send(&app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["state"], "recalling");
    assert_eq!(body["card"]["word"], "export");
    // Meaning stays hidden while recalling
    assert!(body["card"]["chinese_meaning"].is_null());
    let id = body["id"].as_str().unwrap().to_string();

    // Grading before reveal is rejected
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/grade", id),
        Some(json!({ "quality": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::POST, &format!("/api/sessions/{}/reveal", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "evaluating");
    assert_eq!(body["card"]["chinese_meaning"], "出口");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/grade", id),
        Some(json!({ "quality": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "recalling");
    assert_eq!(body["card"]["word"], "import");
    assert_eq!(body["reviewed_count"], 1);
    assert_eq!(body["last_result"]["word"], "export");

    send(&app, Method::POST, &format!("/api/sessions/{}/reveal", id), None).await;
    let (_, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/grade", id),
        Some(json!({ "quality": 1 })),
    )
    .await;
    assert_eq!(body["state"], "completed");
    assert_eq!(body["reviewed_count"], 2);

    // Finished sessions are dropped from the registry
    let (status, _) = send(&app, Method::GET, &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_end_session_early() {
    let (app, state) = common::create_test_app().await;
    common::add_word(&state.db, "export", "出口", &["ex", "port"], 0).await;

    let (_, body) = send(&app, Method::POST, "/api/sessions", None).await;
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(state.sessions.len(), 1);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "idle");
    assert!(body["card"].is_null());

    let (status, _) = send(&app, Method::GET, &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_deleted_word_is_skipped() {
    let (app, state) = common::create_test_app().await;
    common::add_word(&state.db, "export", "出口", &["ex", "port"], 0).await;
    common::add_word(&state.db, "import", "进口", &["im", "port"], 1).await;

    let (_, body) = send(&app, Method::POST, "/api/sessions", None).await;
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["card"]["word"], "export");
    send(&app, Method::POST, &format!("/api/sessions/{}/reveal", id), None).await;

    let (status, _) = send(&app, Method::DELETE, "/api/words/export", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/grade", id),
        Some(json!({ "quality": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "recalling");
    assert_eq!(body["card"]["word"], "import");
    assert_eq!(body["reviewed_count"], 0);
    assert!(body["last_result"].is_null());

    // The last card going away finishes the session
    send(&app, Method::POST, &format!("/api/sessions/{}/reveal", id), None).await;
    send(&app, Method::DELETE, "/api/words/import", None).await;
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/grade", id),
        Some(json!({ "quality": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "completed");
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_empty_sessions_are_not_kept() {
    let (app, state) = common::create_test_app().await;

    for _ in 0..50 {
        let (status, body) = send(&app, Method::POST, "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["state"], "completed");
    }
    assert_eq!(state.sessions.len(), 0);
}

#[tokio::test]
async fn test_idle_sessions_expire() {
    let db = common::test_db().await;
    common::add_word(&db, "export", "", &["ex", "port"], 0).await;
    let sessions = ReviewSessions::with_ttl(1_000);

    let stale = sessions.start(&db, 10_000).await.unwrap();
    let active = sessions.start(&db, 10_500).await.unwrap();
    sessions.reveal(active.id, 11_000).await.unwrap();
    assert_eq!(sessions.len(), 2);

    // The first session has been idle past the TTL, the second was revealed at 11_000
    let fresh = sessions.start(&db, 11_500).await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(matches!(
        sessions.get(stale.id).await,
        Err(SessionError::NotFound(_))
    ));
    assert!(sessions.get(active.id).await.is_ok());
    assert!(sessions.get(fresh.id).await.is_ok());
}

#[tokio::test]
async fn test_session_grade_validation() {
    let (app, state) = common::create_test_app().await;
    common::add_word(&state.db, "export", "", &["ex", "port"], 0).await;

    let (_, body) = send(&app, Method::POST, "/api/sessions", None).await;
    let id = body["id"].as_str().unwrap().to_string();
    send(&app, Method::POST, &format!("/api/sessions/{}/reveal", id), None).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/grade", id),
        Some(json!({ "quality": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Still waiting for a valid grade
    let (_, body) = send(&app, Method::GET, &format!("/api/sessions/{}", id), None).await;
    assert_eq!(body["state"], "evaluating");
}

#[tokio::test]
async fn test_unknown_and_malformed_session_ids() {
    let (app, _state) = common::create_test_app().await;

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/sessions/0192f7a0-0000-7000-8000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/sessions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let db = common::test_db().await;
    common::add_word(&db, "export", "", &["ex", "port"], 0).await;
    let sessions = ReviewSessions::new();
    let now = now_millis();

    let first = sessions.start(&db, now).await.unwrap();
    let second = sessions.start(&db, now).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(sessions.len(), 2);

    sessions.reveal(first.id, now).await.unwrap();
    let graded = sessions.grade(&db, first.id, 5, now).await.unwrap();
    assert_eq!(graded.state, ReviewState::Completed);

    // The second session still holds its card, but a double reveal fails
    sessions.reveal(second.id, now).await.unwrap();
    assert!(matches!(
        sessions.reveal(second.id, now).await,
        Err(SessionError::InvalidTransition { .. })
    ));

    // The completed session has already left the registry
    assert_eq!(sessions.len(), 1);
    assert!(matches!(
        sessions.end(first.id).await,
        Err(SessionError::NotFound(_))
    ));
    sessions.end(second.id).await.unwrap();
    assert!(sessions.is_empty());
}
