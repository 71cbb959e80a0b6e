//! Per-project roll-up computed from the stored event history.

use std::collections::BTreeSet;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::events::{EventKind, EventRecord};

/// Funding totals for one project.
///
/// Amounts are `i128` on chain and are serialised as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub project_id: String,
    pub owner: Option<String>,
    #[serde(serialize_with = "decimal_opt")]
    pub goal: Option<i128>,
    #[serde(serialize_with = "decimal")]
    pub funded_total: i128,
    #[serde(serialize_with = "decimal")]
    pub refunded_total: i128,
    #[serde(serialize_with = "decimal")]
    pub claimed_total: i128,
    /// Still held by the registry for this project.
    #[serde(serialize_with = "decimal")]
    pub outstanding: i128,
    pub contributions: usize,
    pub contributors: usize,
    pub refunds: usize,
    pub target_reached: bool,
    pub claimed: bool,
    pub last_ledger: i64,
}

impl ProjectSummary {
    /// Fold a project's events (any order) into its summary.
    pub fn from_events(project_id: &str, events: &[EventRecord]) -> Self {
        let mut summary = ProjectSummary {
            project_id: project_id.to_string(),
            ..Default::default()
        };
        let mut contributors = BTreeSet::new();

        for ev in events {
            summary.last_ledger = summary.last_ledger.max(ev.ledger);
            match EventKind::from_stored(&ev.event_type) {
                EventKind::ProjectCreated => {
                    summary.owner = ev.actor.clone();
                    summary.goal = amount_of(ev);
                }
                EventKind::ProjectFunded => {
                    summary.funded_total = summary.funded_total.saturating_add(amount_or_zero(ev));
                    summary.contributions += 1;
                    if let Some(who) = &ev.actor {
                        contributors.insert(who.as_str());
                    }
                }
                EventKind::FundsRefunded => {
                    summary.refunded_total =
                        summary.refunded_total.saturating_add(amount_or_zero(ev));
                    summary.refunds += 1;
                }
                EventKind::FundsClaimed => {
                    summary.claimed_total = summary.claimed_total.saturating_add(amount_or_zero(ev));
                    summary.claimed = true;
                }
                EventKind::ProjectTargetReached => summary.target_reached = true,
                _ => {}
            }
        }

        summary.contributors = contributors.len();
        summary.outstanding = summary
            .funded_total
            .saturating_sub(summary.refunded_total)
            .saturating_sub(summary.claimed_total);
        summary
    }
}

fn amount_of(ev: &EventRecord) -> Option<i128> {
    let raw = ev.amount.as_deref()?;
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("Event {} carries a malformed amount {raw:?}", ev.id);
            None
        }
    }
}

fn amount_or_zero(ev: &EventRecord) -> i128 {
    amount_of(ev).unwrap_or(0)
}

fn decimal<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn decimal_opt<S: Serializer>(value: &Option<i128>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}
