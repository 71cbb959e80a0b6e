//! Soroban RPC client: pages through `getEvents` for the registry and
//! decodes what comes back.
//!
//! Transport failures, HTTP 429 and soft JSON-RPC errors are retried with
//! exponential back-off starting at [`INITIAL_BACKOFF_SECS`] and capped at
//! [`MAX_BACKOFF_SECS`]. Invalid-request and unknown-method errors end the
//! poll.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, FundraiserEvent};
use crate::xdr::ScVal;

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// JSON-RPC codes that will not succeed on retry.
const HARD_RPC_ERRORS: [i64; 2] = [-32600, -32601];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list, either base64 XDR or the RPC's JSON rendering.
    pub topic: Vec<String>,
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// One page of results from [`fetch_events`].
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Backoff {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    async fn wait(&mut self, reason: &str) {
        warn!("{reason} (will retry in {}s)", self.secs);
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = next_backoff(self.secs);
    }
}

fn next_backoff(secs: u64) -> u64 {
    secs.saturating_mul(2).min(MAX_BACKOFF_SECS)
}

// ─────────────────────────────────────────────────────────
// Fetching
// ─────────────────────────────────────────────────────────

/// Fetch one page of registry events.
///
/// With a `cursor` the request continues a previous page; otherwise it
/// scans from `start_ledger` (inclusive).
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = Backoff::new();
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let resp = match client.post(rpc_url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                backoff.wait(&format!("RPC request failed: {e}")).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            backoff.wait("Rate-limited by RPC").await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if HARD_RPC_ERRORS.contains(&err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            backoff
                .wait(&format!("RPC soft error {}: {}", err.code, err.message))
                .await;
            continue;
        }

        let result = body.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    match cursor {
        Some(cur) => params["pagination"]["cursor"] = json!(cur),
        None => params["startLedger"] = json!(start_ledger),
    }

    params
}

// ─────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────

/// Decode raw RPC events, dropping those from failed invocations and
/// those without a topic.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<FundraiserEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<FundraiserEvent> {
    let kind = EventKind::from_topic(&extract_symbol(raw.topic.first()?));

    let project_id = if kind.is_project_scoped() {
        raw.topic.get(1).map(|t| extract_u64_or_raw(t))
    } else {
        None
    };
    let (actor, amount) = decode_data(&data_as_json(&raw.value), kind);

    Some(FundraiserEvent {
        event_type: kind.as_str().to_string(),
        project_id,
        actor,
        amount,
        ledger: raw.ledger.unwrap_or(0) as i64,
        timestamp: raw
            .ledger_closed_at
            .as_deref()
            .and_then(parse_iso_to_unix)
            .unwrap_or(0),
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.as_deref().map(normalize_tx_hash),
    })
}

/// The event data in JSON form. A string that parses as base64 XDR is
/// decoded; anything else is taken as already rendered.
fn data_as_json(value: &Value) -> Value {
    match value.as_str().and_then(ScVal::from_base64) {
        Some(val) => val.to_json(),
        None => value.clone(),
    }
}

/// Pick the actor and amount out of the event's data struct.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::ProjectCreated => (
            extract_field(value, &["owner"]),
            extract_field(value, &["goal"]),
        ),
        EventKind::ProjectFunded | EventKind::FundsRefunded => (
            extract_field(value, &["contributor"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::ProjectTargetReached => (None, extract_field(value, &["amount_raised"])),
        EventKind::FundsClaimed => (
            extract_field(value, &["owner"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::DescriptionChanged => (extract_field(value, &["owner"]), None),
        // Administrative events carry a bare address as data.
        EventKind::RegistryPaused | EventKind::RegistryUnpaused | EventKind::RegistryDeprecated => {
            let actor = value
                .as_str()
                .map(String::from)
                .or_else(|| extract_field(value, &["address", "value"]));
            (actor, None)
        }
        EventKind::Unknown => (None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        nested => nested.get("value").and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }),
    })
}

/// Leading topic as a symbol string. Accepts the RPC's JSON rendering
/// (`{"type":"symbol","value":"funded"}`), base64 XDR, or a bare string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    if let Some(ScVal::Symbol(s)) = ScVal::from_base64(raw) {
        return s;
    }
    raw.to_string()
}

/// Project id from the second topic, in any of the renderings
/// [`extract_symbol`] accepts.
fn extract_u64_or_raw(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        match v.get("value") {
            Some(Value::Number(n)) => return n.to_string(),
            Some(Value::String(s)) => return s.clone(),
            _ => {}
        }
    }
    if let Some(ScVal::U64(n)) = ScVal::from_base64(raw) {
        return n.to_string();
    }
    raw.to_string()
}

/// Lower-case a 32-byte hex transaction hash; anything else passes through.
fn normalize_tx_hash(raw: &str) -> String {
    match hex::decode(raw) {
        Ok(bytes) if bytes.len() == 32 => hex::encode(bytes),
        _ => raw.to_string(),
    }
}

fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}
