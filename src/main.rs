// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wordnet API Server
//!
//! Serves the vocabulary store, morpheme network and review scheduler.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wordnet::{
    config::Config,
    db::WordDb,
    services::{ReviewSessions, SeedFile},
    time_utils::now_millis,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        database = %config.database_path,
        "Starting Wordnet API"
    );

    if config.is_in_memory() {
        tracing::warn!("Using an in-memory database, words are lost on shutdown");
    }
    let db = WordDb::open(&config.database_path).await?;

    // Load default vocabulary into an empty store
    if let Some(seed_path) = &config.seed_file {
        tracing::info!(path = %seed_path, "Loading default words");
        match SeedFile::load_from_file(seed_path) {
            Ok(seed) => {
                seed.apply(&db, now_millis()).await?;
            }
            Err(e) => tracing::warn!(error = %e, "Default words not loaded"),
        }
    }

    let stats = db.stats(now_millis()).await?;
    tracing::info!(
        words = stats.word_count,
        mastered = stats.mastered_count,
        due = stats.due_count,
        "Word store ready"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db: db.clone(),
        sessions: ReviewSessions::with_ttl(config.session_ttl_millis()),
    });

    // Build router
    let app = wordnet::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wordnet=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
