// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interactive review session routes.

use super::{QualityRequest, ScheduleSummary};
use crate::error::Result;
use crate::services::{ReviewSession, ReviewState};
use crate::time_utils::now_millis;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Session routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sessions", post(start_session))
        .route("/api/sessions/{id}", get(get_session).delete(end_session))
        .route("/api/sessions/{id}/reveal", post(reveal))
        .route("/api/sessions/{id}/grade", post(grade))
}

/// Current card. The meaning stays hidden until it is revealed.
#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionCard {
    pub word: String,
    pub morphemes: Vec<String>,
    pub chinese_meaning: Option<String>,
    pub memory_strength: f64,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub id: String,
    pub state: ReviewState,
    pub card: Option<SessionCard>,
    pub reviewed_count: u32,
    pub last_result: Option<ScheduleSummary>,
}

impl SessionResponse {
    fn new(session: &ReviewSession, now: i64) -> Self {
        let revealed = session.state == ReviewState::Evaluating;
        let card = session.current_word.as_ref().map(|w| SessionCard {
            word: w.word.clone(),
            morphemes: w.morphemes(),
            chinese_meaning: revealed.then(|| w.chinese_meaning.clone()),
            memory_strength: w.memory_strength,
        });

        Self {
            id: session.id.to_string(),
            state: session.state,
            card,
            reviewed_count: session.reviewed_count,
            last_result: session
                .last_result
                .as_ref()
                .map(|item| ScheduleSummary::from_item(item, now)),
        }
    }
}

/// Start a session on the due words.
async fn start_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let now = now_millis();
    let session = state.sessions.start(&state.db, now).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::new(&session, now))))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionResponse::new(&session, now_millis())))
}

/// Show the meaning of the current card.
async fn reveal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state.sessions.reveal(id, now_millis()).await?;
    Ok(Json(SessionResponse::new(&session, now_millis())))
}

/// Grade the current card and move to the next one.
async fn grade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<QualityRequest>,
) -> Result<Json<SessionResponse>> {
    let quality = req.quality()?;
    let now = now_millis();
    let session = state.sessions.grade(&state.db, id, quality, now).await?;
    Ok(Json(SessionResponse::new(&session, now)))
}

async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state.sessions.end(id).await?;
    Ok(Json(SessionResponse::new(&session, now_millis())))
}
