// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Learning statistics routes.

use crate::error::Result;
use crate::time_utils::now_millis;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/stats/roots", get(root_stats))
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub word_count: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub mastered_count: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub due_count: i64,
    /// mastered / total, 0 when the store is empty
    pub mastery_ratio: f64,
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>> {
    let stats = state.db.stats(now_millis()).await?;
    let mastery_ratio = if stats.word_count > 0 {
        stats.mastered_count as f64 / stats.word_count as f64
    } else {
        0.0
    };

    Ok(Json(StatsResponse {
        word_count: stats.word_count,
        mastered_count: stats.mastered_count,
        due_count: stats.due_count,
        mastery_ratio,
    }))
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RootStatResponse {
    pub root: String,
    pub morphemes: Vec<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub word_count: i64,
    pub avg_strength: f64,
}

/// Active words grouped by morpheme list, largest groups first.
async fn root_stats(State(state): State<Arc<AppState>>) -> Result<Json<Vec<RootStatResponse>>> {
    let rows = state.db.root_statistics().await?;
    Ok(Json(
        rows.iter()
            .map(|row| RootStatResponse {
                root: row.primary_root(),
                morphemes: crate::models::word::parse_morpheme_list(&row.morpheme_list),
                word_count: row.word_count,
                avg_strength: row.avg_strength,
            })
            .collect(),
    ))
}
