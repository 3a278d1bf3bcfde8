// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review session state machine.
//!
//! A session walks the due words one at a time:
//!
//! ```text
//! start ─► Recalling ─reveal─► Evaluating ─grade─► Recalling ─ ... ─► Completed
//!     └──────────── nothing due ───────────────────────────────────► Completed
//! ```
//!
//! Sessions are kept in memory only; each one sits behind its own async
//! mutex so a grade (which writes to the database) never races a reveal.
//! Finished and long-idle sessions are dropped from the registry.

use crate::db::WordDb;
use crate::error::AppError;
use crate::models::{ReviewItem, WordNode};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Where a session is in the recall/evaluate loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Not started or already ended
    Idle,
    /// Word shown without its meaning
    Recalling,
    /// Meaning shown, waiting for a grade
    Evaluating,
    /// Nothing left to review
    Completed,
}

/// One review session.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    pub id: Uuid,
    pub state: ReviewState,
    pub current_word: Option<WordNode>,
    pub reviewed_count: u32,
    /// Schedule produced by the most recent grade
    pub last_result: Option<ReviewItem>,
}

impl ReviewSession {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            state: ReviewState::Idle,
            current_word: None,
            reviewed_count: 0,
            last_result: None,
        }
    }

    /// Show the next word, or finish when there is none.
    fn advance(&mut self, next: Option<WordNode>) {
        self.state = if next.is_some() {
            ReviewState::Recalling
        } else {
            ReviewState::Completed
        };
        self.current_word = next;
    }

    /// Recalling → Evaluating.
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        if self.state != ReviewState::Recalling {
            return Err(SessionError::InvalidTransition {
                action: "reveal",
                state: self.state,
            });
        }
        self.state = ReviewState::Evaluating;
        Ok(())
    }

    /// Word awaiting a grade.
    fn word_to_grade(&self) -> Result<String, SessionError> {
        match (&self.state, &self.current_word) {
            (ReviewState::Evaluating, Some(word)) => Ok(word.word.clone()),
            _ => Err(SessionError::InvalidTransition {
                action: "grade",
                state: self.state,
            }),
        }
    }
}

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Review session {0} not found")]
    NotFound(Uuid),

    #[error("Cannot {action} while session is {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: ReviewState,
    },

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
            SessionError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            SessionError::Store(inner) => inner,
        }
    }
}

/// Default idle time before an unfinished session is dropped.
pub const DEFAULT_SESSION_TTL_MILLIS: i64 = 60 * 60 * 1000;

/// A live session and the time it was last used.
struct SessionEntry {
    session: Arc<Mutex<ReviewSession>>,
    last_active: Arc<AtomicI64>,
}

/// Shared session map type.
type SessionMap = Arc<DashMap<Uuid, SessionEntry>>;

/// Registry of live review sessions.
///
/// Completed sessions are dropped as soon as their final view is returned.
/// Sessions left idle for longer than the TTL are evicted when a new one
/// starts.
#[derive(Clone)]
pub struct ReviewSessions {
    sessions: SessionMap,
    ttl_millis: i64,
}

impl Default for ReviewSessions {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL_MILLIS)
    }
}

impl ReviewSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that evicts sessions idle for more than `ttl_millis`.
    pub fn with_ttl(ttl_millis: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl_millis: ttl_millis.max(1),
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn handle(&self, id: Uuid, now: Option<i64>) -> Result<Arc<Mutex<ReviewSession>>, SessionError> {
        let entry = self.sessions.get(&id).ok_or(SessionError::NotFound(id))?;
        if let Some(now) = now {
            entry.last_active.store(now, Ordering::Relaxed);
        }
        Ok(entry.session.clone())
    }

    /// Drop sessions idle since before `now - ttl`.
    fn evict_idle(&self, now: i64) {
        let before = self.sessions.len();
        let cutoff = now.saturating_sub(self.ttl_millis);
        self.sessions
            .retain(|_, entry| entry.last_active.load(Ordering::Relaxed) > cutoff);

        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::info!(evicted, "Idle review sessions evicted");
        }
    }

    /// Start a session and load the first due word.
    ///
    /// A session with nothing to review comes back Completed and is not kept.
    pub async fn start(&self, db: &WordDb, now: i64) -> Result<ReviewSession, SessionError> {
        self.evict_idle(now);

        let mut session = ReviewSession::new(Uuid::now_v7());
        session.advance(db.next_due_word(now).await?);

        tracing::info!(
            session_id = %session.id,
            state = ?session.state,
            "Review session started"
        );

        if session.state != ReviewState::Completed {
            self.sessions.insert(
                session.id,
                SessionEntry {
                    session: Arc::new(Mutex::new(session.clone())),
                    last_active: Arc::new(AtomicI64::new(now)),
                },
            );
        }
        Ok(session)
    }

    /// Snapshot of a session.
    pub async fn get(&self, id: Uuid) -> Result<ReviewSession, SessionError> {
        let handle = self.handle(id, None)?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    /// Reveal the meaning of the current word.
    pub async fn reveal(&self, id: Uuid, now: i64) -> Result<ReviewSession, SessionError> {
        let handle = self.handle(id, Some(now))?;
        let mut session = handle.lock().await;
        session.reveal()?;
        Ok(session.clone())
    }

    /// Grade the current word and move on to the next due one.
    ///
    /// A word deleted or unscheduled since it was shown is skipped without
    /// counting as reviewed.
    pub async fn grade(
        &self,
        db: &WordDb,
        id: Uuid,
        quality: u8,
        now: i64,
    ) -> Result<ReviewSession, SessionError> {
        let handle = self.handle(id, Some(now))?;
        let mut session = handle.lock().await;

        let word = session.word_to_grade()?;
        match db.process_review(&word, quality, now).await {
            Ok(result) => {
                session.reviewed_count += 1;
                session.last_result = Some(result);
            }
            Err(AppError::NotFound(_)) => {
                tracing::warn!(session_id = %id, word = %word, "Word vanished during review, skipping");
            }
            Err(e) => return Err(e.into()),
        }
        session.advance(db.next_due_word(now).await?);

        tracing::debug!(
            session_id = %id,
            word = %word,
            reviewed = session.reviewed_count,
            state = ?session.state,
            "Session graded"
        );

        if session.state == ReviewState::Completed {
            self.sessions.remove(&id);
            tracing::info!(
                session_id = %id,
                reviewed = session.reviewed_count,
                "Review session completed"
            );
        }

        Ok(session.clone())
    }

    /// End a session and forget it.
    pub async fn end(&self, id: Uuid) -> Result<ReviewSession, SessionError> {
        let (_, entry) = self
            .sessions
            .remove(&id)
            .ok_or(SessionError::NotFound(id))?;
        let mut session = entry.session.lock().await;
        session.state = ReviewState::Idle;
        session.current_word = None;

        tracing::info!(
            session_id = %id,
            reviewed = session.reviewed_count,
            "Review session ended"
        );
        Ok(session.clone())
    }
}
