//! Fundraiser event indexer.
//!
//! Polls Soroban `getEvents` for the registry's events, persists them to
//! SQLite and serves them, plus per-project summaries, over a small Axum
//! REST API.

mod api;
mod config;
mod db;
mod errors;
mod events;
mod indexer;
mod rpc;
mod summary;
mod xdr;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use indexer::IndexerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let pool = db::init_pool(&config.database_url).await?;

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let shutdown = CancellationToken::new();

    let indexer_state = Arc::new(IndexerState {
        pool: pool.clone(),
        config: config.clone(),
        client,
    });
    let indexer = tokio::spawn(indexer::run(indexer_state, shutdown.clone()));

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/events", get(api::get_all_events))
        .route("/projects/:id/events", get(api::get_project_events))
        .route("/projects/:id/summary", get(api::get_project_summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(api::ApiState { pool }));

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_ctrl_c(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Err(e) = indexer.await {
        warn!("Indexer task ended abnormally: {e}");
    }
    Ok(())
}

async fn wait_for_ctrl_c(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {e}");
        // Without a signal handler, only an explicit cancel stops the server.
        shutdown.cancelled().await;
    }
    info!("Shutting down");
    shutdown.cancel();
}
