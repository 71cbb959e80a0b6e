//! SQLite store: migrations, the resume cursor and event queries.

use sqlx::{sqlite::SqliteConnectOptions, sqlite::SqlitePoolOptions, SqlitePool};
use std::str::FromStr;
use tracing::info;

use crate::errors::Result;
use crate::events::{EventRecord, FundraiserEvent};

const EVENT_COLUMNS: &str = "id, event_type, project_id, actor, amount, ledger, timestamp, \
                             contract_id, tx_hash, created_at";

/// Open (creating if needed) the database and apply pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    // Every connection to `:memory:` is its own database.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────

/// Where the previous run stopped: `(last_ledger, pagination cursor)`.
/// A fresh database yields `(0, None)`.
pub async fn load_cursor(pool: &SqlitePool) -> Result<(i64, Option<String>)> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.unwrap_or((0, None)))
}

pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO indexer_cursor (id, last_ledger, last_cursor) VALUES (1, ?1, ?2)
        ON CONFLICT (id) DO UPDATE SET last_ledger = excluded.last_ledger,
                                       last_cursor = excluded.last_cursor
        "#,
    )
    .bind(last_ledger)
    .bind(last_cursor)
    .execute(pool)
    .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Writes
// ─────────────────────────────────────────────────────────

/// Store a batch of decoded events in one transaction and return how many
/// were new. Rows repeating `(ledger, tx_hash, event_type, project_id)`,
/// with a missing hash or project counting as equal, are skipped, so
/// re-polling a ledger range is harmless.
pub async fn insert_events(pool: &SqlitePool, events: &[FundraiserEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        count += sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_type, project_id, actor, amount, ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&ev.event_type)
        .bind(&ev.project_id)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected() as usize;
    }
    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────

/// Events for one project, oldest first.
pub async fn get_events_for_project(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE project_id = ?1 ORDER BY ledger ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(project_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// All events, oldest first, optionally narrowed to one stored event type.
pub async fn get_all_events(pool: &SqlitePool, event_type: Option<&str>) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE (?1 IS NULL OR event_type = ?1) ORDER BY ledger ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(event_type)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
