// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Word-to-morpheme relation records that form the word network.

use serde::{Deserialize, Serialize};

/// Where a morpheme sits inside its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum MorphemePosition {
    Prefix = 0,
    Root = 1,
    Suffix = 2,
}

/// Stored relation (`morpheme_relations` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MorphemeRelation {
    /// Row ID (0 until stored)
    pub id: i64,
    /// Morpheme string, e.g. "struct", "re", "pre"
    pub morpheme: String,
    /// Owning word (foreign key to `word_nodes.word`)
    pub word_id: String,
    pub position: MorphemePosition,
}

impl MorphemeRelation {
    pub fn new(morpheme: &str, word_id: &str, position: MorphemePosition) -> Self {
        Self {
            id: 0,
            morpheme: morpheme.to_string(),
            word_id: word_id.to_string(),
            position,
        }
    }
}
