// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite).
//!
//! `WordDb` owns the connection pool. Its operations are split by table:
//! - `words`: word nodes, aggregate counts and root statistics
//! - `morphemes`: the word-to-morpheme network
//! - `review_queue`: SM-2 schedule and atomic review processing

mod morphemes;
mod review_queue;
mod words;

use crate::config::IN_MEMORY_DATABASE;
use crate::error::AppError;
use crate::services::Sm2Scheduler;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Connections kept for a file-backed database.
const MAX_FILE_CONNECTIONS: u32 = 4;

/// Column list for `word_nodes` SELECT queries.
const WORD_COLUMNS: &str = "word, memory_strength, last_reviewed, review_count, \
    is_active, morpheme_list, chinese_meaning";

/// Same columns qualified with the `w` alias, for joins.
const WORD_COLUMNS_W: &str = "w.word, w.memory_strength, w.last_reviewed, w.review_count, \
    w.is_active, w.morpheme_list, w.chinese_meaning";

/// Column list for `review_queue` SELECT queries.
const REVIEW_COLUMNS: &str =
    "word_id, next_review_time, interval_days, easiness_factor, repetition_count";

/// SQLite-backed word store.
#[derive(Clone)]
pub struct WordDb {
    pool: SqlitePool,
    scheduler: Sm2Scheduler,
}

impl WordDb {
    /// Open (or create) the database and apply migrations.
    ///
    /// `:memory:` opens a private in-memory database on a single pinned
    /// connection, so its contents live as long as this `WordDb`.
    pub async fn open(path: &str) -> Result<Self, AppError> {
        let in_memory = path == IN_MEMORY_DATABASE;

        let options = if in_memory {
            tracing::info!("Connecting to in-memory SQLite database");
            SqliteConnectOptions::new().in_memory(true)
        } else {
            tracing::info!(path, "Connecting to SQLite database");
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        }
        .foreign_keys(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_FILE_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open SQLite database: {}", e)))?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;

        tracing::debug!("Database schema is up to date");

        Ok(Self {
            pool,
            scheduler: Sm2Scheduler,
        })
    }

    /// Open a throwaway in-memory database.
    pub async fn open_in_memory() -> Result<Self, AppError> {
        Self::open(IN_MEMORY_DATABASE).await
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        tracing::debug!("Closing database connections");
        self.pool.close().await;
    }
}

/// Escape LIKE wildcards so user input matches literally (used with `ESCAPE '\'`).
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
