//! Learning statistics returned by aggregate queries.

use serde::{Deserialize, Serialize};

use crate::models::word::parse_morpheme_list;

/// Per-morpheme-list aggregate over active words.
///
/// Words sharing the exact same decomposition fall into one group; the
/// group is labelled by its first morpheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RootStatistic {
    pub morpheme_list: String,
    pub word_count: i64,
    pub avg_strength: f64,
}

impl RootStatistic {
    /// First morpheme of the group, or "unknown" for an empty list.
    pub fn primary_root(&self) -> String {
        parse_morpheme_list(&self.morpheme_list)
            .into_iter()
            .next()
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStats {
    /// Active words
    pub word_count: i64,
    /// Active words at or above the mastery threshold
    pub mastered_count: i64,
    /// Active words due for review now
    pub due_count: i64,
}
