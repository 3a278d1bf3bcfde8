// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review queue model.

use serde::{Deserialize, Serialize};

/// Initial SM-2 easiness factor.
pub const DEFAULT_EASINESS: f64 = 2.5;
/// Lowest allowed easiness factor.
pub const MIN_EASINESS: f64 = 1.3;
/// Highest quality grade.
pub const MAX_QUALITY: u8 = 5;

/// Scheduled review for one word (`review_queue` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewItem {
    /// Word being scheduled (primary key, foreign key to `word_nodes.word`)
    pub word_id: String,
    /// When the word is next due (epoch millis)
    pub next_review_time: i64,
    /// Current interval in days
    pub interval_days: i64,
    /// SM-2 easiness factor
    pub easiness_factor: f64,
    /// Consecutive successful reviews
    pub repetition_count: i64,
}

impl ReviewItem {
    /// Whether the item is due at `now`.
    pub fn is_due(&self, now: i64) -> bool {
        self.next_review_time <= now
    }
}

/// Self-assessed recall quality.
///
/// The UI offers four grades; the remaining values of the 0..=5 scale are
/// accepted and treated by the scheduler like their neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewQuality {
    Forgot,
    Hard,
    Good,
    Perfect,
    Other(u8),
}

impl From<u8> for ReviewQuality {
    fn from(value: u8) -> Self {
        match value {
            0 => ReviewQuality::Forgot,
            3 => ReviewQuality::Hard,
            4 => ReviewQuality::Good,
            5 => ReviewQuality::Perfect,
            other => ReviewQuality::Other(other),
        }
    }
}

impl ReviewQuality {
    /// Short description of the grade.
    pub fn description(self) -> &'static str {
        match self {
            ReviewQuality::Forgot => "forgot",
            ReviewQuality::Hard => "hard",
            ReviewQuality::Good => "good",
            ReviewQuality::Perfect => "perfect",
            ReviewQuality::Other(_) => "unknown",
        }
    }

    /// Feedback shown after grading.
    pub fn feedback(self) -> &'static str {
        match self {
            ReviewQuality::Forgot => "Forgot - will come back soon",
            ReviewQuality::Hard => "Hard - reviewing more often",
            ReviewQuality::Good => "Good - keeping the schedule",
            ReviewQuality::Perfect => "Perfect - extending the interval",
            ReviewQuality::Other(_) => "Recorded",
        }
    }
}
