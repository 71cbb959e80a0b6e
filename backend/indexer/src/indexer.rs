//! Background task that polls the RPC for registry events and stores them.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Where the next poll starts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Position {
    ledger: u32,
    cursor: Option<String>,
}

impl Position {
    /// A saved ledger wins over the configured start ledger.
    fn resume(saved_ledger: i64, saved_cursor: Option<String>, start_ledger: u32) -> Self {
        match u32::try_from(saved_ledger) {
            Ok(ledger) if ledger > 0 => Position {
                ledger,
                cursor: saved_cursor,
            },
            _ => Position {
                ledger: start_ledger,
                cursor: None,
            },
        }
    }

    /// Keep paging while the RPC hands back a cursor; the ledger never
    /// moves backwards.
    fn advance(&self, latest_ledger: Option<u64>, next_cursor: Option<String>) -> Self {
        let latest = latest_ledger
            .and_then(|l| u32::try_from(l).ok())
            .unwrap_or(self.ledger);
        Position {
            ledger: latest.max(self.ledger),
            cursor: next_cursor,
        }
    }
}

/// Run the poll loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting for registry {}", state.config.contract_id);

    let (saved_ledger, saved_cursor) = match db::load_cursor(&state.pool).await {
        Ok(saved) => saved,
        Err(e) => {
            error!("Could not read saved cursor, starting fresh: {e}");
            (0, None)
        }
    };
    let mut position = Position::resume(saved_ledger, saved_cursor, state.config.start_ledger);
    info!("Resuming from ledger {}", position.ledger);

    loop {
        match poll_once(&state, &position).await {
            Ok(next) => position = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Indexer stopping at ledger {}", position.ledger);
                break;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }
}

async fn poll_once(state: &IndexerState, position: &Position) -> Result<Position> {
    let config = &state.config;
    let page = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            "Polled {} raw events, {} new records stored",
            page.events.len(),
            inserted
        );
    }

    let next = position.advance(page.latest_ledger, page.cursor);
    db::save_cursor(&state.pool, i64::from(next.ledger), next.cursor.as_deref()).await?;
    Ok(next)
}
