// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Word operations (`word_nodes`).

use super::{escape_like, morphemes::write_relations, WordDb, WORD_COLUMNS};
use crate::error::{AppError, Result};
use crate::models::word::MASTERY_THRESHOLD;
use crate::models::{RootStatistic, WordNode, WordStats};
use sqlx::SqliteConnection;

impl WordDb {
    // ─── Writes ──────────────────────────────────────────────────

    /// Insert a new word together with its morpheme relations and an
    /// initial review item due at `now`.
    ///
    /// Fails with `Conflict` if the word already exists.
    pub async fn insert_word(&self, word: &WordNode, now: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if fetch_word(&mut tx, &word.word).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Word '{}' already exists",
                word.word
            )));
        }

        insert_word_row(&mut tx, word).await?;
        write_relations(&mut tx, &word.parse_morpheme_relations()).await?;

        let item = self.scheduler.initial_item(&word.word, now);
        super::review_queue::upsert_item(&mut tx, &item).await?;

        tx.commit().await?;

        tracing::info!(word = %word.word, "Word added");
        Ok(())
    }

    /// Overwrite every column of a stored word. Relations are rebuilt when
    /// the morpheme list changed.
    pub async fn update_word(&self, word: &WordNode) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let existing = fetch_word(&mut tx, &word.word)
            .await?
            .ok_or_else(|| AppError::word_not_found(&word.word))?;

        update_word_row(&mut tx, word).await?;

        if existing.morphemes() != word.morphemes() {
            sqlx::query("DELETE FROM morpheme_relations WHERE word_id = ?")
                .bind(&word.word)
                .execute(&mut *tx)
                .await?;
            write_relations(&mut tx, &word.parse_morpheme_relations()).await?;
            tracing::debug!(word = %word.word, "Morpheme relations rebuilt");
        }

        tx.commit().await?;
        Ok(())
    }

    /// Change a word's meaning and/or morphemes, leaving its learning
    /// state alone. Returns the stored word.
    ///
    /// The read and write share one transaction, so a review committed in
    /// between is never overwritten.
    pub async fn update_details(
        &self,
        word: &str,
        chinese_meaning: Option<&str>,
        morphemes: Option<&[String]>,
    ) -> Result<WordNode> {
        let mut tx = self.pool.begin().await?;

        let mut node = fetch_word(&mut tx, word)
            .await?
            .ok_or_else(|| AppError::word_not_found(word))?;

        if let Some(meaning) = chinese_meaning {
            node.chinese_meaning = meaning.trim().to_string();
        }
        let old_morphemes = node.morphemes();
        if let Some(list) = morphemes {
            node.set_morphemes(list);
        }

        sqlx::query("UPDATE word_nodes SET chinese_meaning = ?, morpheme_list = ? WHERE word = ?")
            .bind(&node.chinese_meaning)
            .bind(&node.morpheme_list)
            .bind(&node.word)
            .execute(&mut *tx)
            .await?;

        if old_morphemes != node.morphemes() {
            sqlx::query("DELETE FROM morpheme_relations WHERE word_id = ?")
                .bind(&node.word)
                .execute(&mut *tx)
                .await?;
            write_relations(&mut tx, &node.parse_morpheme_relations()).await?;
            tracing::debug!(word = %node.word, "Morpheme relations rebuilt");
        }

        tx.commit().await?;

        tracing::info!(word = %node.word, "Word details updated");
        Ok(node)
    }

    /// Hard delete. Relations and the review item go with it.
    pub async fn delete_word(&self, word: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM word_nodes WHERE word = ?")
            .bind(word)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::word_not_found(word));
        }

        tracing::info!(word, "Word deleted");
        Ok(())
    }

    /// Soft delete: hide the word from lists, statistics and reviews.
    pub async fn archive_word(&self, word: &str) -> Result<()> {
        let result = sqlx::query("UPDATE word_nodes SET is_active = 0 WHERE word = ?")
            .bind(word)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::word_not_found(word));
        }

        tracing::info!(word, "Word archived");
        Ok(())
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// Get a word by key, archived or not.
    pub async fn get_word(&self, word: &str) -> Result<Option<WordNode>> {
        let mut conn = self.pool.acquire().await?;
        fetch_word(&mut conn, word).await
    }

    /// All active words, weakest first.
    pub async fn list_active_words(&self) -> Result<Vec<WordNode>> {
        let query = format!(
            "SELECT {WORD_COLUMNS} FROM word_nodes \
             WHERE is_active = 1 \
             ORDER BY memory_strength ASC, word ASC"
        );
        Ok(sqlx::query_as::<_, WordNode>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    /// The `limit` weakest active words.
    pub async fn weak_words(&self, limit: u32) -> Result<Vec<WordNode>> {
        let query = format!(
            "SELECT {WORD_COLUMNS} FROM word_nodes \
             WHERE is_active = 1 \
             ORDER BY memory_strength ASC, word ASC \
             LIMIT ?"
        );
        Ok(sqlx::query_as::<_, WordNode>(&query)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?)
    }

    /// Active words whose morpheme list contains `root` as a substring.
    ///
    /// "struct" matches both `["re","struct","ion"]` and `["struct","ure"]`.
    pub async fn words_by_root(&self, root: &str) -> Result<Vec<WordNode>> {
        let query = format!(
            "SELECT {WORD_COLUMNS} FROM word_nodes \
             WHERE morpheme_list LIKE '%' || ? || '%' ESCAPE '\\' \
             AND is_active = 1 \
             ORDER BY word ASC"
        );
        Ok(sqlx::query_as::<_, WordNode>(&query)
            .bind(escape_like(root))
            .fetch_all(&self.pool)
            .await?)
    }

    /// Word count and average strength per morpheme list, largest groups first.
    pub async fn root_statistics(&self) -> Result<Vec<RootStatistic>> {
        Ok(sqlx::query_as::<_, RootStatistic>(
            "SELECT morpheme_list, \
                COUNT(*) AS word_count, \
                AVG(memory_strength) AS avg_strength \
             FROM word_nodes \
             WHERE is_active = 1 \
             GROUP BY morpheme_list \
             ORDER BY word_count DESC, morpheme_list ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Number of active words.
    pub async fn word_count(&self) -> Result<i64> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM word_nodes WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?,
        )
    }

    /// Number of stored words including archived ones.
    pub async fn total_word_count(&self) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM word_nodes")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Number of active words at or above the mastery threshold.
    pub async fn mastered_count(&self) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM word_nodes WHERE is_active = 1 AND memory_strength >= ?",
        )
        .bind(MASTERY_THRESHOLD)
        .fetch_one(&self.pool)
        .await?)
    }

    /// Dashboard counters at `now`.
    pub async fn stats(&self, now: i64) -> Result<WordStats> {
        Ok(WordStats {
            word_count: self.word_count().await?,
            mastered_count: self.mastered_count().await?,
            due_count: self.due_count(now).await?,
        })
    }
}

// ─── Connection-level helpers (shared with transactions) ────────

pub(super) async fn fetch_word(conn: &mut SqliteConnection, word: &str) -> Result<Option<WordNode>> {
    let query = format!("SELECT {WORD_COLUMNS} FROM word_nodes WHERE word = ? LIMIT 1");
    Ok(sqlx::query_as::<_, WordNode>(&query)
        .bind(word)
        .fetch_optional(&mut *conn)
        .await?)
}

async fn insert_word_row(conn: &mut SqliteConnection, word: &WordNode) -> Result<()> {
    let query = format!(
        "INSERT INTO word_nodes ({WORD_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
    );
    sqlx::query(&query)
        .bind(&word.word)
        .bind(word.memory_strength)
        .bind(word.last_reviewed)
        .bind(word.review_count)
        .bind(word.is_active)
        .bind(&word.morpheme_list)
        .bind(&word.chinese_meaning)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(super) async fn update_word_row(conn: &mut SqliteConnection, word: &WordNode) -> Result<()> {
    sqlx::query(
        "UPDATE word_nodes SET \
            memory_strength = ?, last_reviewed = ?, review_count = ?, \
            is_active = ?, morpheme_list = ?, chinese_meaning = ? \
         WHERE word = ?",
    )
    .bind(word.memory_strength)
    .bind(word.last_reviewed)
    .bind(word.review_count)
    .bind(word.is_active)
    .bind(&word.morpheme_list)
    .bind(&word.chinese_meaning)
    .bind(&word.word)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
