// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Morpheme network operations (`morpheme_relations`).

use super::{WordDb, WORD_COLUMNS_W};
use crate::error::Result;
use crate::models::{MorphemeRelation, WordNode};
use sqlx::SqliteConnection;

impl WordDb {
    /// Relations of one word, prefix first.
    pub async fn relations_for_word(&self, word: &str) -> Result<Vec<MorphemeRelation>> {
        Ok(sqlx::query_as::<_, MorphemeRelation>(
            "SELECT id, morpheme, word_id, position FROM morpheme_relations \
             WHERE word_id = ? \
             ORDER BY position ASC, id ASC",
        )
        .bind(word)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Active words that contain exactly this morpheme.
    pub async fn words_by_morpheme(&self, morpheme: &str) -> Result<Vec<WordNode>> {
        let query = format!(
            "SELECT DISTINCT {WORD_COLUMNS_W} FROM word_nodes w \
             INNER JOIN morpheme_relations mr ON w.word = mr.word_id \
             WHERE mr.morpheme = ? AND w.is_active = 1 \
             ORDER BY w.word ASC"
        );
        Ok(sqlx::query_as::<_, WordNode>(&query)
            .bind(morpheme)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Every distinct morpheme, alphabetically.
    pub async fn all_morphemes(&self) -> Result<Vec<String>> {
        Ok(sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT morpheme FROM morpheme_relations ORDER BY morpheme ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Insert relations, replacing identical ones.
    pub async fn insert_relations(&self, relations: &[MorphemeRelation]) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        write_relations(&mut conn, relations).await
    }
}

pub(super) async fn write_relations(
    conn: &mut SqliteConnection,
    relations: &[MorphemeRelation],
) -> Result<()> {
    for relation in relations {
        sqlx::query(
            "INSERT OR REPLACE INTO morpheme_relations (morpheme, word_id, position) \
             VALUES (?, ?, ?)",
        )
        .bind(&relation.morpheme)
        .bind(&relation.word_id)
        .bind(relation.position)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
