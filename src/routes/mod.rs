// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod review;
pub mod sessions;
pub mod stats;
pub mod words;

use crate::error::Result;
use crate::models::{ReviewItem, WordNode};
use crate::time_utils::format_millis_rfc3339;
use crate::AppState;
use axum::http::{header, Method};
use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Largest page a list endpoint will return.
pub const MAX_LIMIT: u32 = 100;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(health_check))
        .merge(words::routes())
        .merge(review::routes())
        .merge(sessions::routes())
        .merge(stats::routes())
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

// ─── Shared Request / Response Types ─────────────────────────

/// `?limit=` query parameter.
#[derive(Deserialize, Validate)]
pub(crate) struct LimitQuery {
    #[validate(range(min = 1, max = 100))]
    limit: Option<u32>,
}

impl LimitQuery {
    /// Validated limit, or `default` when none was given.
    pub(crate) fn resolve(&self, default: u32) -> Result<u32> {
        self.validate()?;
        Ok(self.limit.unwrap_or(default).clamp(1, MAX_LIMIT))
    }
}

/// Word as returned by the API.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WordSummary {
    pub word: String,
    pub chinese_meaning: String,
    pub morphemes: Vec<String>,
    pub memory_strength: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub review_count: i64,
    pub mastered: bool,
    pub is_active: bool,
    pub last_reviewed: String,
}

impl From<&WordNode> for WordSummary {
    fn from(node: &WordNode) -> Self {
        Self {
            word: node.word.clone(),
            chinese_meaning: node.chinese_meaning.clone(),
            morphemes: node.morphemes(),
            memory_strength: node.memory_strength,
            review_count: node.review_count,
            mastered: node.is_mastered(),
            is_active: node.is_active,
            last_reviewed: format_millis_rfc3339(node.last_reviewed),
        }
    }
}

pub(crate) fn summarize(words: &[WordNode]) -> Vec<WordSummary> {
    words.iter().map(WordSummary::from).collect()
}

/// SM-2 schedule as returned by the API.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScheduleSummary {
    pub word: String,
    pub next_review_at: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub interval_days: i64,
    pub easiness_factor: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub repetition_count: i64,
    pub due: bool,
}

impl ScheduleSummary {
    pub fn from_item(item: &ReviewItem, now: i64) -> Self {
        Self {
            word: item.word_id.clone(),
            next_review_at: format_millis_rfc3339(item.next_review_time),
            interval_days: item.interval_days,
            easiness_factor: item.easiness_factor,
            repetition_count: item.repetition_count,
            due: item.is_due(now),
        }
    }
}

#[derive(Deserialize, Validate)]
pub(crate) struct QualityRequest {
    #[validate(range(max = 5))]
    quality: u8,
}

impl QualityRequest {
    /// Validated quality grade.
    pub(crate) fn quality(&self) -> Result<u8> {
        self.validate()?;
        Ok(self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_query() {
        assert_eq!(LimitQuery { limit: None }.resolve(10).unwrap(), 10);
        assert_eq!(LimitQuery { limit: Some(3) }.resolve(10).unwrap(), 3);
        assert!(LimitQuery { limit: Some(0) }.resolve(10).is_err());
        assert!(LimitQuery { limit: Some(101) }.resolve(10).is_err());
    }

    #[test]
    fn test_quality_request() {
        assert_eq!(QualityRequest { quality: 4 }.quality().unwrap(), 4);
        assert!(QualityRequest { quality: 6 }.quality().is_err());
    }

    #[test]
    fn test_word_summary_from_node() {
        let mut node = WordNode::with_details("export", "出口", &["ex".into(), "port".into()], 0);
        node.set_memory_strength(0.9);

        let summary = WordSummary::from(&node);
        assert_eq!(summary.morphemes, vec!["ex", "port"]);
        assert!(summary.mastered);
        assert_eq!(summary.last_reviewed, "1970-01-01T00:00:00Z");
    }
}
