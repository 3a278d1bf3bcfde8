// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SM-2 spaced-repetition scheduler.
//!
//! Each review grade (0-5) adjusts the item's easiness factor and decides the
//! next interval:
//! - grade < 3: the word was forgotten, start over with a 1-day interval
//! - first success: 1 day, second success: 6 days
//! - later successes: previous interval times the easiness factor

use crate::models::review::{ReviewItem, DEFAULT_EASINESS, MAX_QUALITY, MIN_EASINESS};
use crate::time_utils::days_to_millis;

/// Interval used after a failed recall and for new items.
const MIN_INTERVAL_DAYS: i64 = 1;
/// Interval after the second consecutive success.
const SECOND_INTERVAL_DAYS: i64 = 6;
/// Grades below this count as a failed recall.
const PASSING_QUALITY: u8 = 3;

/// Stateless SM-2 calculator.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sm2Scheduler;

impl Sm2Scheduler {
    /// Review item for a newly added word, due immediately.
    pub fn initial_item(&self, word_id: &str, now: i64) -> ReviewItem {
        ReviewItem {
            word_id: word_id.to_string(),
            next_review_time: now,
            interval_days: MIN_INTERVAL_DAYS,
            easiness_factor: DEFAULT_EASINESS,
            repetition_count: 0,
        }
    }

    /// Compute the schedule after a review graded `quality`.
    ///
    /// Grades above 5 are treated as 5.
    pub fn next_review(&self, item: &ReviewItem, quality: u8, now: i64) -> ReviewItem {
        let quality = quality.min(MAX_QUALITY);
        let easiness = next_easiness(item.easiness_factor, quality);

        let (interval_days, repetition_count) = if quality < PASSING_QUALITY {
            (MIN_INTERVAL_DAYS, 0)
        } else {
            let repetitions = item.repetition_count + 1;
            let interval = match repetitions {
                1 => MIN_INTERVAL_DAYS,
                2 => SECOND_INTERVAL_DAYS,
                _ => ((item.interval_days as f64) * easiness).round() as i64,
            };
            (interval.max(MIN_INTERVAL_DAYS), repetitions)
        };

        ReviewItem {
            word_id: item.word_id.clone(),
            next_review_time: now.saturating_add(days_to_millis(interval_days)),
            interval_days,
            easiness_factor: easiness,
            repetition_count,
        }
    }
}

/// `EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored at 1.3.
fn next_easiness(current: f64, quality: u8) -> f64 {
    let distance = f64::from(MAX_QUALITY - quality);
    let change = 0.1 - distance * (0.08 + distance * 0.02);
    (current + change).max(MIN_EASINESS)
}
