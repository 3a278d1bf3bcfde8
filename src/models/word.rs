// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Vocabulary word model and its memory-strength bookkeeping.

use serde::{Deserialize, Serialize};

use crate::models::morpheme::{MorphemePosition, MorphemeRelation};
use crate::time_utils::days_to_millis;

/// Strength at or above which a word counts as mastered.
pub const MASTERY_THRESHOLD: f64 = 0.8;
/// Maximum length of a word, in characters.
pub const MAX_WORD_LEN: usize = 50;

/// Stored word record (`word_nodes` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WordNode {
    /// The word itself (primary key, lowercase)
    pub word: String,
    /// Memory strength in [0.0, 1.0]: 0 = forgotten, 1 = permanently known
    pub memory_strength: f64,
    /// Last review time (epoch millis)
    pub last_reviewed: i64,
    /// Number of reviews so far
    pub review_count: i64,
    /// False once the word has been archived
    pub is_active: bool,
    /// Morphemes as a JSON array, e.g. `["re","struct","tion"]`
    pub morpheme_list: String,
    /// Chinese meaning
    pub chinese_meaning: String,
}

impl WordNode {
    /// Create a fresh word with default learning state.
    pub fn new(word: &str, now: i64) -> Self {
        Self {
            word: word.to_string(),
            memory_strength: 0.0,
            last_reviewed: now,
            review_count: 0,
            is_active: true,
            morpheme_list: "[]".to_string(),
            chinese_meaning: String::new(),
        }
    }

    /// Create a word with meaning and morphemes.
    pub fn with_details(word: &str, chinese_meaning: &str, morphemes: &[String], now: i64) -> Self {
        let mut node = Self::new(word, now);
        node.chinese_meaning = chinese_meaning.to_string();
        node.set_morphemes(morphemes);
        node
    }

    /// Set memory strength, clamped to [0, 1].
    pub fn set_memory_strength(&mut self, strength: f64) {
        self.memory_strength = strength.clamp(0.0, 1.0);
    }

    pub fn is_mastered(&self) -> bool {
        self.memory_strength >= MASTERY_THRESHOLD
    }

    /// Estimate the next review time on a forgetting curve.
    ///
    /// Base interval doubles per review (1, 2, 4, 8, 16 days) and is capped at
    /// 15 days from the fifth review on. Stronger memories stretch it up to 3x.
    pub fn next_review_time(&self) -> i64 {
        let base_days: f64 = if self.review_count < 5 {
            2f64.powi(self.review_count.max(0) as i32)
        } else {
            15.0
        };
        let modifier = 1.0 + self.memory_strength * 2.0;
        let interval = (base_days * modifier * days_to_millis(1) as f64) as i64;
        self.last_reviewed.saturating_add(interval)
    }

    /// Update memory strength after a right/wrong answer.
    pub fn update_memory_strength(&mut self, correct: bool, now: i64) {
        let new_count = self.review_count + 1;

        let base_gain = if correct { 0.3 } else { -0.1 };
        // The first three reviews count extra to get through short-term memory
        let count_multiplier = if new_count <= 3 { 1.5 } else { 1.0 };
        // Gains shrink as the word gets stronger
        let difficulty = 1.0 - self.memory_strength * 0.5;

        let gain = base_gain * count_multiplier * difficulty;
        let old_strength = self.memory_strength;
        self.set_memory_strength(old_strength + gain);

        self.review_count = new_count;
        self.last_reviewed = now;

        tracing::debug!(
            word = %self.word,
            correct,
            old_strength,
            new_strength = self.memory_strength,
            "Memory strength updated"
        );
    }

    /// Update memory strength from an SM-2 quality grade (>= 3 counts as correct).
    pub fn update_memory_strength_by_quality(&mut self, quality: u8, now: i64) {
        self.update_memory_strength(quality >= 3, now);
    }

    /// Parsed morpheme list.
    pub fn morphemes(&self) -> Vec<String> {
        parse_morpheme_list(&self.morpheme_list)
    }

    /// Replace the morpheme list.
    pub fn set_morphemes(&mut self, morphemes: &[String]) {
        self.morpheme_list = format_morpheme_list(morphemes);
    }

    /// Build relation records from the morpheme list.
    ///
    /// `["re","struct","tion"]` gives re=prefix, struct=root, tion=suffix.
    pub fn parse_morpheme_relations(&self) -> Vec<MorphemeRelation> {
        let morphemes = self.morphemes();
        let last = morphemes.len().saturating_sub(1);

        morphemes
            .into_iter()
            .enumerate()
            .map(|(i, morpheme)| {
                let position = if last == 0 {
                    MorphemePosition::Root
                } else if i == 0 {
                    MorphemePosition::Prefix
                } else if i == last {
                    MorphemePosition::Suffix
                } else {
                    MorphemePosition::Root
                };
                MorphemeRelation::new(&morpheme, &self.word, position)
            })
            .collect()
    }
}

/// Normalize user input into a stored word key.
pub fn normalize_word(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parse a stored morpheme list.
///
/// Accepts a JSON string array, or the loose `[re, struct, tion]` form with
/// optional quotes. Blank entries are dropped.
pub fn parse_morpheme_list(raw: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
        return list
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
    }

    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim().to_string())
        .filter(|m| !m.is_empty())
        .collect()
}

/// The given morphemes, or the word itself as its only root when none
/// are usable.
pub fn morphemes_or_self(morphemes: &[String], word: &str) -> Vec<String> {
    if morphemes.iter().any(|m| !m.trim().is_empty()) {
        morphemes.to_vec()
    } else {
        vec![word.to_string()]
    }
}

/// Serialize morphemes as a JSON array, normalized like word keys.
pub fn format_morpheme_list(morphemes: &[String]) -> String {
    let cleaned: Vec<String> = morphemes
        .iter()
        .map(|m| normalize_word(m))
        .filter(|m| !m.is_empty())
        .collect();
    serde_json::to_string(&cleaned).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 24 * 60 * 60 * 1000;

    #[test]
    fn test_next_review_time_calculation() {
        let mut word = WordNode::new("test", 0);
        word.set_memory_strength(0.5);
        word.review_count = 2; // base interval = 4 days

        // 4 days * (1 + 0.5 * 2) = 8 days
        assert_eq!(word.next_review_time() - word.last_reviewed, 8 * DAY);
    }

    #[test]
    fn test_next_review_time_boundaries() {
        let mut word = WordNode::new("test", 0);

        word.set_memory_strength(0.0);
        assert_eq!(word.next_review_time(), DAY);

        word.set_memory_strength(1.0);
        assert_eq!(word.next_review_time(), 3 * DAY);

        word.set_memory_strength(0.0);
        word.review_count = 7;
        assert_eq!(word.next_review_time(), 15 * DAY);
    }

    #[test]
    fn test_strength_is_clamped() {
        let mut word = WordNode::new("test", 0);
        word.set_memory_strength(1.7);
        assert_eq!(word.memory_strength, 1.0);
        word.set_memory_strength(-0.2);
        assert_eq!(word.memory_strength, 0.0);
    }

    #[test]
    fn test_correct_answer_early_bonus() {
        let mut word = WordNode::new("test", 0);
        word.update_memory_strength(true, 1_000);

        // 0.3 * 1.5 * 1.0
        assert!((word.memory_strength - 0.45).abs() < 1e-9);
        assert_eq!(word.review_count, 1);
        assert_eq!(word.last_reviewed, 1_000);
    }

    #[test]
    fn test_wrong_answer_never_goes_negative() {
        let mut word = WordNode::new("test", 0);
        word.update_memory_strength(false, 1_000);
        assert_eq!(word.memory_strength, 0.0);
        assert_eq!(word.review_count, 1);
    }

    #[test]
    fn test_gain_shrinks_with_strength() {
        let mut word = WordNode::new("test", 0);
        word.set_memory_strength(0.6);
        word.review_count = 5;
        word.update_memory_strength(true, 0);

        // 0.3 * 1.0 * (1 - 0.3) = 0.21
        assert!((word.memory_strength - 0.81).abs() < 1e-9);
        assert!(word.is_mastered());
    }

    #[test]
    fn test_quality_maps_to_correctness() {
        let mut hard = WordNode::new("a", 0);
        hard.update_memory_strength_by_quality(3, 0);
        assert!(hard.memory_strength > 0.0);

        let mut forgot = WordNode::new("b", 0);
        forgot.set_memory_strength(0.5);
        forgot.update_memory_strength_by_quality(2, 0);
        assert!(forgot.memory_strength < 0.5);
    }

    #[test]
    fn test_parse_morpheme_list_formats() {
        let expected = vec!["re".to_string(), "struct".to_string(), "tion".to_string()];
        assert_eq!(parse_morpheme_list(r#"["re","struct","tion"]"#), expected);
        assert_eq!(parse_morpheme_list("[re, struct, tion]"), expected);
        assert_eq!(parse_morpheme_list(r#"["re", "", "struct","tion"]"#), expected);
        assert!(parse_morpheme_list("[]").is_empty());
        assert!(parse_morpheme_list("").is_empty());
    }

    #[test]
    fn test_format_morpheme_list_drops_blanks() {
        let list = vec![" re ".to_string(), "".to_string(), "port".to_string()];
        assert_eq!(format_morpheme_list(&list), r#"["re","port"]"#);
    }

    #[test]
    fn test_morphemes_are_lowercased() {
        let mut node = WordNode::new("export", 0);
        node.set_morphemes(&["Ex".to_string(), " PORT".to_string()]);
        assert_eq!(node.morphemes(), vec!["ex", "port"]);
        assert_eq!(node.parse_morpheme_relations()[1].morpheme, "port");
    }

    #[test]
    fn test_morphemes_or_self() {
        let given = vec!["ex".to_string(), "port".to_string()];
        assert_eq!(morphemes_or_self(&given, "export"), given);
        assert_eq!(morphemes_or_self(&[], "cat"), vec!["cat"]);
        assert_eq!(morphemes_or_self(&[" ".to_string()], "cat"), vec!["cat"]);
    }

    #[test]
    fn test_relations_positions() {
        let word = WordNode::with_details(
            "reconstruction",
            "重建",
            &["re".into(), "con".into(), "struct".into(), "ion".into()],
            0,
        );
        let positions: Vec<_> = word
            .parse_morpheme_relations()
            .into_iter()
            .map(|r| (r.morpheme, r.position))
            .collect();

        assert_eq!(
            positions,
            vec![
                ("re".to_string(), MorphemePosition::Prefix),
                ("con".to_string(), MorphemePosition::Root),
                ("struct".to_string(), MorphemePosition::Root),
                ("ion".to_string(), MorphemePosition::Suffix),
            ]
        );
    }

    #[test]
    fn test_single_morpheme_is_root() {
        let word = WordNode::with_details("cat", "", &["cat".into()], 0);
        let relations = word.parse_morpheme_relations();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].position, MorphemePosition::Root);
        assert_eq!(relations[0].word_id, "cat");
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Structure "), "structure");
    }
}
