// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Word management and morpheme network routes.

use super::{summarize, LimitQuery, ScheduleSummary, WordSummary};
use crate::error::{AppError, Result};
use crate::models::word::{morphemes_or_self, normalize_word, MAX_WORD_LEN};
use crate::models::{MorphemePosition, WordNode};
use crate::time_utils::{format_millis_rfc3339, now_millis};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Word routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/words", get(list_words).post(add_word))
        .route("/api/words/weak", get(weak_words))
        .route(
            "/api/words/{word}",
            get(get_word).put(update_word).delete(delete_word),
        )
        .route("/api/words/{word}/archive", post(archive_word))
        .route("/api/words/{word}/review", post(review_word))
        .route("/api/words/{word}/graph", get(word_graph))
        .route("/api/roots/{root}/words", get(words_by_root))
        .route("/api/morphemes", get(all_morphemes))
        .route("/api/morphemes/{morpheme}/words", get(words_by_morpheme))
}

/// Validate and normalize a word key.
pub(crate) fn parse_word(raw: &str) -> Result<String> {
    let word = normalize_word(raw);
    if word.is_empty() {
        return Err(AppError::BadRequest("Word must not be empty".to_string()));
    }
    if word.chars().count() > MAX_WORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Word must be at most {} characters",
            MAX_WORD_LEN
        )));
    }
    Ok(word)
}

async fn load_word(state: &AppState, word: &str) -> Result<WordNode> {
    state
        .db
        .get_word(word)
        .await?
        .ok_or_else(|| AppError::word_not_found(word))
}

// ─── Word CRUD ───────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct AddWordRequest {
    word: String,
    #[validate(length(max = 200))]
    chinese_meaning: Option<String>,
    #[validate(length(max = 20))]
    morphemes: Option<Vec<String>>,
}

/// List active words, weakest first.
async fn list_words(State(state): State<Arc<AppState>>) -> Result<Json<Vec<WordSummary>>> {
    let words = state.db.list_active_words().await?;
    Ok(Json(summarize(&words)))
}

/// Add a word. Without explicit morphemes the word is its own root.
async fn add_word(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddWordRequest>,
) -> Result<(StatusCode, Json<WordSummary>)> {
    req.validate()?;
    let word = parse_word(&req.word)?;

    let morphemes = morphemes_or_self(&req.morphemes.unwrap_or_default(), &word);
    let meaning = req.chinese_meaning.unwrap_or_default();

    let now = now_millis();
    let node = WordNode::with_details(&word, meaning.trim(), &morphemes, now);
    state.db.insert_word(&node, now).await?;

    Ok((StatusCode::CREATED, Json(WordSummary::from(&node))))
}

/// Word detail response.
#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WordDetailResponse {
    pub word: WordSummary,
    /// Forgetting-curve estimate of the next review
    pub next_review_estimate: String,
    pub relations: Vec<RelationSummary>,
    pub schedule: Option<ScheduleSummary>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RelationSummary {
    pub morpheme: String,
    /// "prefix", "root" or "suffix"
    pub position: String,
}

fn position_label(position: MorphemePosition) -> String {
    match position {
        MorphemePosition::Prefix => "prefix",
        MorphemePosition::Root => "root",
        MorphemePosition::Suffix => "suffix",
    }
    .to_string()
}

/// Get one word with its relations and schedule.
async fn get_word(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
) -> Result<Json<WordDetailResponse>> {
    let word = parse_word(&word)?;
    let node = load_word(&state, &word).await?;

    let relations = state
        .db
        .relations_for_word(&word)
        .await?
        .into_iter()
        .map(|r| RelationSummary {
            morpheme: r.morpheme,
            position: position_label(r.position),
        })
        .collect();

    let now = now_millis();
    let schedule = state
        .db
        .get_review_item(&word)
        .await?
        .map(|item| ScheduleSummary::from_item(&item, now));

    Ok(Json(WordDetailResponse {
        word: WordSummary::from(&node),
        next_review_estimate: format_millis_rfc3339(node.next_review_time()),
        relations,
        schedule,
    }))
}

#[derive(Deserialize, Validate)]
struct UpdateWordRequest {
    #[validate(length(max = 200))]
    chinese_meaning: Option<String>,
    #[validate(length(max = 20))]
    morphemes: Option<Vec<String>>,
}

/// Change a word's meaning and/or morphemes.
async fn update_word(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
    Json(req): Json<UpdateWordRequest>,
) -> Result<Json<WordSummary>> {
    req.validate()?;
    let word = parse_word(&word)?;
    let morphemes = req
        .morphemes
        .map(|list| morphemes_or_self(&list, &word));

    let node = state
        .db
        .update_details(&word, req.chinese_meaning.as_deref(), morphemes.as_deref())
        .await?;

    Ok(Json(WordSummary::from(&node)))
}

/// Remove a word and everything attached to it.
async fn delete_word(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
) -> Result<StatusCode> {
    let word = parse_word(&word)?;
    state.db.delete_word(&word).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Hide a word without deleting it.
async fn archive_word(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
) -> Result<StatusCode> {
    let word = parse_word(&word)?;
    state.db.archive_word(&word).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct ReviewAnswerRequest {
    correct: bool,
}

/// Record a right/wrong answer (memory strength only).
async fn review_word(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
    Json(req): Json<ReviewAnswerRequest>,
) -> Result<Json<WordSummary>> {
    let word = parse_word(&word)?;
    let node = state.db.review_word(&word, req.correct, now_millis()).await?;
    Ok(Json(WordSummary::from(&node)))
}

/// Weakest words.
async fn weak_words(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<WordSummary>>> {
    let limit = params.resolve(state.config.weak_words_limit)?;
    let words = state.db.weak_words(limit).await?;
    Ok(Json(summarize(&words)))
}

// ─── Morpheme Network ────────────────────────────────────────

/// A word's morphemes and the other words sharing each one.
#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WordGraphResponse {
    pub word: String,
    pub morphemes: Vec<GraphMorpheme>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GraphMorpheme {
    pub morpheme: String,
    pub position: String,
    pub related_words: Vec<String>,
}

/// Morpheme network around one word.
async fn word_graph(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
) -> Result<Json<WordGraphResponse>> {
    let word = parse_word(&word)?;
    load_word(&state, &word).await?;

    let relations = state.db.relations_for_word(&word).await?;
    let mut morphemes = Vec::with_capacity(relations.len());
    for relation in relations {
        let related_words = state
            .db
            .words_by_morpheme(&relation.morpheme)
            .await?
            .into_iter()
            .map(|w| w.word)
            .filter(|w| *w != word)
            .collect();

        morphemes.push(GraphMorpheme {
            morpheme: relation.morpheme,
            position: position_label(relation.position),
            related_words,
        });
    }

    Ok(Json(WordGraphResponse { word, morphemes }))
}

/// Words whose morpheme list mentions `root`.
async fn words_by_root(
    State(state): State<Arc<AppState>>,
    Path(root): Path<String>,
) -> Result<Json<Vec<WordSummary>>> {
    let root = normalize_word(&root);
    if root.is_empty() {
        return Err(AppError::BadRequest("Root must not be empty".to_string()));
    }
    let words = state.db.words_by_root(&root).await?;
    Ok(Json(summarize(&words)))
}

/// Every known morpheme.
async fn all_morphemes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.db.all_morphemes().await?))
}

/// Words that contain exactly this morpheme.
async fn words_by_morpheme(
    State(state): State<Arc<AppState>>,
    Path(morpheme): Path<String>,
) -> Result<Json<Vec<WordSummary>>> {
    let words = state
        .db
        .words_by_morpheme(&normalize_word(&morpheme))
        .await?;
    Ok(Json(summarize(&words)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word() {
        assert_eq!(parse_word("  Export ").unwrap(), "export");
        assert!(matches!(parse_word("   "), Err(AppError::BadRequest(_))));
        assert!(parse_word(&"a".repeat(50)).is_ok());
        assert!(parse_word(&"a".repeat(51)).is_err());
    }
}
