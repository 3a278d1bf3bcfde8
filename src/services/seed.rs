// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Default vocabulary loader.
//!
//! Populates an empty store from a JSON file shaped like:
//!
//! ```json
//! { "words": [ { "word": "restructure", "chinese": "重组", "morphemes": ["re", "struct", "ure"] } ] }
//! ```

use crate::db::WordDb;
use crate::error::AppError;
use crate::models::word::{morphemes_or_self, normalize_word};
use crate::models::WordNode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Seed file root.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub words: Vec<SeedWord>,
}

/// One seed entry.
#[derive(Debug, Deserialize)]
pub struct SeedWord {
    pub word: String,
    #[serde(default)]
    pub chinese: String,
    #[serde(default)]
    pub morphemes: Vec<String>,
}

impl SeedFile {
    /// Load from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| SeedError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, SeedError> {
        serde_json::from_str(json_data).map_err(|e| SeedError::ParseError(e.to_string()))
    }

    /// Insert every entry into an empty store.
    ///
    /// Does nothing if the store already holds words, so it is safe to call
    /// on every startup. Returns the number of words inserted.
    pub async fn apply(&self, db: &WordDb, now: i64) -> Result<usize, SeedError> {
        if db.total_word_count().await? > 0 {
            tracing::debug!("Store already populated, skipping seed data");
            return Ok(0);
        }

        let mut inserted = 0;
        for entry in &self.words {
            let key = normalize_word(&entry.word);
            if key.is_empty() {
                tracing::warn!("Skipping seed entry with empty word");
                continue;
            }

            let morphemes = morphemes_or_self(&entry.morphemes, &key);
            let node = WordNode::with_details(&key, entry.chinese.trim(), &morphemes, now);
            match db.insert_word(&node, now).await {
                Ok(()) => inserted += 1,
                Err(AppError::Conflict(_)) => {
                    tracing::warn!(word = %key, "Duplicate seed entry skipped");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(count = inserted, "Default words loaded");
        Ok(inserted)
    }
}

/// Errors from seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    IoError(String),

    #[error("Failed to parse seed file: {0}")]
    ParseError(String),

    #[error("Failed to store seed data: {0}")]
    Store(#[from] AppError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_json() {
        let seed = SeedFile::load_from_json(
            r#"{ "words": [
                { "word": "Export", "chinese": "出口", "morphemes": ["ex", "port"] },
                { "word": "cat" }
            ] }"#,
        )
        .expect("valid seed");

        assert_eq!(seed.words.len(), 2);
        assert_eq!(seed.words[0].morphemes, vec!["ex", "port"]);
        assert!(seed.words[1].chinese.is_empty());
    }

    #[test]
    fn test_malformed_seed_is_rejected() {
        let err = SeedFile::load_from_json(r#"{ "items": [] }"#).unwrap_err();
        assert!(matches!(err, SeedError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SeedFile::load_from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, SeedError::IoError(_)));
    }
}
