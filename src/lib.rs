// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wordnet: vocabulary memory tracker built on a morpheme network.
//!
//! Words are linked through their prefixes, roots and suffixes, and each
//! word carries a memory strength plus an SM-2 review schedule. This crate
//! provides the SQLite-backed store and the JSON API on top of it.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::WordDb;
use services::ReviewSessions;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: WordDb,
    pub sessions: ReviewSessions,
}
