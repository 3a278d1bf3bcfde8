// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod morpheme;
pub mod review;
pub mod stats;
pub mod word;

pub use morpheme::{MorphemePosition, MorphemeRelation};
pub use review::{ReviewItem, ReviewQuality};
pub use stats::{RootStatistic, WordStats};
pub use word::WordNode;
