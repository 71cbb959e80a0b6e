//! Indexer settings, read from the process environment.

use std::str::FromStr;

use crate::errors::{IndexerError, Result};

const DEFAULT_RPC_URL: &str = "https://soroban-testnet.stellar.org";
const DEFAULT_DATABASE_URL: &str = "sqlite:./fundraiser_events.db";

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint.
    pub rpc_url: String,
    /// Strkey address of the deployed fundraiser registry.
    pub contract_id: String,
    pub database_url: String,
    pub api_port: u16,
    pub poll_interval_secs: u64,
    /// Page size for each `getEvents` request.
    pub events_per_page: u32,
    /// Ledger to scan from when no cursor has been saved yet.
    pub start_ledger: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let contract_id = lookup("CONTRACT_ID")
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                IndexerError::Config("CONTRACT_ID environment variable is required".to_string())
            })?;

        Ok(Config {
            rpc_url: lookup("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            contract_id,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            api_port: parse_or(&lookup, "API_PORT", 3001)?,
            poll_interval_secs: parse_or(&lookup, "POLL_INTERVAL_SECS", 5)?,
            events_per_page: parse_or(&lookup, "EVENTS_PER_PAGE", 100)?,
            start_ledger: parse_or(&lookup, "START_LEDGER", 0)?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| IndexerError::Config(format!("Invalid {key}: {raw:?}"))),
    }
}
