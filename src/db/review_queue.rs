// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review queue operations (`review_queue`) and atomic review processing.

use super::words::{fetch_word, update_word_row};
use super::{WordDb, REVIEW_COLUMNS, WORD_COLUMNS_W};
use crate::error::{AppError, Result};
use crate::models::{ReviewItem, ReviewQuality, WordNode};
use crate::time_utils::format_millis_rfc3339;
use sqlx::SqliteConnection;

impl WordDb {
    // ─── Queue Maintenance ───────────────────────────────────────

    /// Insert or replace the schedule of one word.
    pub async fn upsert_review_item(&self, item: &ReviewItem) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        upsert_item(&mut conn, item).await
    }

    /// Schedule of one word.
    pub async fn get_review_item(&self, word: &str) -> Result<Option<ReviewItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_item(&mut conn, word).await
    }

    /// Every scheduled item, soonest first.
    pub async fn all_review_items(&self) -> Result<Vec<ReviewItem>> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM review_queue ORDER BY next_review_time ASC, word_id ASC"
        );
        Ok(sqlx::query_as::<_, ReviewItem>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Remove the schedule of one word. Returns whether it existed.
    pub async fn delete_review_item(&self, word: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM review_queue WHERE word_id = ?")
            .bind(word)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Empty the whole queue. Returns the number of removed items.
    pub async fn clear_review_queue(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM review_queue")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Make every item due at `now`.
    pub async fn reset_review_queue(&self, now: i64) -> Result<u64> {
        let result = sqlx::query("UPDATE review_queue SET next_review_time = ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        tracing::info!(count = result.rows_affected(), "Review queue reset to due now");
        Ok(result.rows_affected())
    }

    /// Drop the queue and schedule every active word for immediate review.
    pub async fn rebuild_review_queue(&self, now: i64) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM review_queue")
            .execute(&mut *tx)
            .await?;

        let words = sqlx::query_scalar::<_, String>(
            "SELECT word FROM word_nodes WHERE is_active = 1 ORDER BY word ASC",
        )
        .fetch_all(&mut *tx)
        .await?;

        for word in &words {
            let item = self.scheduler.initial_item(word, now);
            upsert_item(&mut tx, &item).await?;
        }

        tx.commit().await?;

        tracing::info!(count = words.len(), "Review queue rebuilt");
        Ok(words.len() as u64)
    }

    // ─── Due Queries ─────────────────────────────────────────────

    /// The most overdue active word, if any is due.
    pub async fn next_due_word(&self, now: i64) -> Result<Option<WordNode>> {
        let query = format!(
            "SELECT {WORD_COLUMNS_W} FROM word_nodes w \
             INNER JOIN review_queue q ON w.word = q.word_id \
             WHERE q.next_review_time <= ? AND w.is_active = 1 \
             ORDER BY q.next_review_time ASC, w.word ASC \
             LIMIT 1"
        );
        Ok(sqlx::query_as::<_, WordNode>(&query)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Up to `limit` due active words, most overdue first.
    pub async fn due_words(&self, now: i64, limit: u32) -> Result<Vec<WordNode>> {
        let query = format!(
            "SELECT {WORD_COLUMNS_W} FROM word_nodes w \
             INNER JOIN review_queue q ON w.word = q.word_id \
             WHERE q.next_review_time <= ? AND w.is_active = 1 \
             ORDER BY q.next_review_time ASC, w.word ASC \
             LIMIT ?"
        );
        Ok(sqlx::query_as::<_, WordNode>(&query)
            .bind(now)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?)
    }

    /// Number of active words due at `now`.
    pub async fn due_count(&self, now: i64) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM review_queue q \
             INNER JOIN word_nodes w ON w.word = q.word_id \
             WHERE q.next_review_time <= ? AND w.is_active = 1",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?)
    }

    // ─── Atomic Review Processing ────────────────────────────────

    /// Grade a review: reschedule with SM-2 and update memory strength.
    ///
    /// Both writes happen in one transaction. Returns the new schedule.
    pub async fn process_review(&self, word: &str, quality: u8, now: i64) -> Result<ReviewItem> {
        let mut tx = self.pool.begin().await?;

        let item = fetch_item(&mut tx, word)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No review item for word '{}'", word)))?;
        let mut node = fetch_word(&mut tx, word)
            .await?
            .ok_or_else(|| AppError::word_not_found(word))?;

        let updated = self.scheduler.next_review(&item, quality, now);
        upsert_item(&mut tx, &updated).await?;

        node.update_memory_strength_by_quality(quality, now);
        update_word_row(&mut tx, &node).await?;

        tx.commit().await?;

        tracing::info!(
            word,
            quality,
            grade = ReviewQuality::from(quality).description(),
            interval_days = updated.interval_days,
            next_review = %format_millis_rfc3339(updated.next_review_time),
            "Review processed"
        );

        Ok(updated)
    }

    /// Record a right/wrong answer without touching the SM-2 schedule.
    pub async fn review_word(&self, word: &str, correct: bool, now: i64) -> Result<WordNode> {
        let mut tx = self.pool.begin().await?;

        let mut node = fetch_word(&mut tx, word)
            .await?
            .ok_or_else(|| AppError::word_not_found(word))?;
        node.update_memory_strength(correct, now);
        update_word_row(&mut tx, &node).await?;

        tx.commit().await?;
        Ok(node)
    }
}

async fn fetch_item(conn: &mut SqliteConnection, word: &str) -> Result<Option<ReviewItem>> {
    let query = format!("SELECT {REVIEW_COLUMNS} FROM review_queue WHERE word_id = ? LIMIT 1");
    Ok(sqlx::query_as::<_, ReviewItem>(&query)
        .bind(word)
        .fetch_optional(&mut *conn)
        .await?)
}

pub(super) async fn upsert_item(conn: &mut SqliteConnection, item: &ReviewItem) -> Result<()> {
    let query = format!(
        "INSERT INTO review_queue ({REVIEW_COLUMNS}) VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT (word_id) DO UPDATE SET \
            next_review_time = excluded.next_review_time, \
            interval_days = excluded.interval_days, \
            easiness_factor = excluded.easiness_factor, \
            repetition_count = excluded.repetition_count"
    );
    sqlx::query(&query)
        .bind(&item.word_id)
        .bind(item.next_review_time)
        .bind(item.interval_days)
        .bind(item.easiness_factor)
        .bind(item.repetition_count)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
