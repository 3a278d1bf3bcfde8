// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SM-2 review queue routes.

use super::words::parse_word;
use super::{summarize, LimitQuery, QualityRequest, ScheduleSummary, WordSummary};
use crate::error::Result;
use crate::models::ReviewQuality;
use crate::time_utils::now_millis;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Review queue routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/review/next", get(next_review))
        .route("/api/review/due", get(due_words))
        .route("/api/review/queue", get(review_queue))
        .route("/api/review/reset", post(reset_queue))
        .route("/api/review/rebuild", post(rebuild_queue))
        .route("/api/review/words/{word}", post(grade_word))
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NextReviewResponse {
    /// Most overdue word, if any
    pub word: Option<WordSummary>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub due_count: i64,
}

/// Next word due for review.
async fn next_review(State(state): State<Arc<AppState>>) -> Result<Json<NextReviewResponse>> {
    let now = now_millis();
    let word = state.db.next_due_word(now).await?;
    let due_count = state.db.due_count(now).await?;

    Ok(Json(NextReviewResponse {
        word: word.as_ref().map(WordSummary::from),
        due_count,
    }))
}

/// Due words, most overdue first.
async fn due_words(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<WordSummary>>> {
    let limit = params.resolve(state.config.review_batch_limit)?;
    let words = state.db.due_words(now_millis(), limit).await?;
    Ok(Json(summarize(&words)))
}

/// Every schedule in the queue.
async fn review_queue(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ScheduleSummary>>> {
    let now = now_millis();
    let items = state.db.all_review_items().await?;
    Ok(Json(
        items
            .iter()
            .map(|item| ScheduleSummary::from_item(item, now))
            .collect(),
    ))
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GradeResponse {
    pub schedule: ScheduleSummary,
    pub grade: String,
    pub feedback: String,
}

/// Grade a recall attempt (0-5) and reschedule the word.
async fn grade_word(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
    Json(req): Json<QualityRequest>,
) -> Result<Json<GradeResponse>> {
    let quality = req.quality()?;
    let word = parse_word(&word)?;
    let now = now_millis();

    let item = state.db.process_review(&word, quality, now).await?;
    let grade = ReviewQuality::from(quality);

    Ok(Json(GradeResponse {
        schedule: ScheduleSummary::from_item(&item, now),
        grade: grade.description().to_string(),
        feedback: grade.feedback().to_string(),
    }))
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct QueueUpdateResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub updated: u64,
}

/// Make every queued word due now.
async fn reset_queue(State(state): State<Arc<AppState>>) -> Result<Json<QueueUpdateResponse>> {
    let updated = state.db.reset_review_queue(now_millis()).await?;
    Ok(Json(QueueUpdateResponse { updated }))
}

/// Recreate the queue from the active words.
async fn rebuild_queue(State(state): State<Arc<AppState>>) -> Result<Json<QueueUpdateResponse>> {
    let updated = state.db.rebuild_review_queue(now_millis()).await?;
    Ok(Json(QueueUpdateResponse { updated }))
}
