//! Event kinds published by the fundraiser registry contract, and the
//! shapes they take once decoded and stored.

use serde::{Deserialize, Serialize};

/// Every topic the registry publishes, keyed by its leading symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// `created`: a project was registered.
    ProjectCreated,
    /// `funded`: a contribution was accepted.
    ProjectFunded,
    /// `target`: the first contribution that met the goal.
    ProjectTargetReached,
    /// `claimed`: the owner took the raised funds.
    FundsClaimed,
    /// `refunded`: a contributor withdrew their stake.
    FundsRefunded,
    /// `desc_set`: the owner replaced the description link.
    DescriptionChanged,
    RegistryPaused,
    RegistryUnpaused,
    /// `deprecated`: the registry points at its successor for good.
    RegistryDeprecated,
    Unknown,
}

impl EventKind {
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::ProjectCreated,
            "funded" => Self::ProjectFunded,
            "target" => Self::ProjectTargetReached,
            "claimed" => Self::FundsClaimed,
            "refunded" => Self::FundsRefunded,
            "desc_set" => Self::DescriptionChanged,
            "paused" => Self::RegistryPaused,
            "unpaused" => Self::RegistryUnpaused,
            "deprecated" => Self::RegistryDeprecated,
            _ => Self::Unknown,
        }
    }

    /// Identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectCreated => "project_created",
            Self::ProjectFunded => "project_funded",
            Self::ProjectTargetReached => "project_target_reached",
            Self::FundsClaimed => "funds_claimed",
            Self::FundsRefunded => "funds_refunded",
            Self::DescriptionChanged => "description_changed",
            Self::RegistryPaused => "registry_paused",
            Self::RegistryUnpaused => "registry_unpaused",
            Self::RegistryDeprecated => "registry_deprecated",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_stored(event_type: &str) -> Self {
        match event_type {
            "project_created" => Self::ProjectCreated,
            "project_funded" => Self::ProjectFunded,
            "project_target_reached" => Self::ProjectTargetReached,
            "funds_claimed" => Self::FundsClaimed,
            "funds_refunded" => Self::FundsRefunded,
            "description_changed" => Self::DescriptionChanged,
            "registry_paused" => Self::RegistryPaused,
            "registry_unpaused" => Self::RegistryUnpaused,
            "registry_deprecated" => Self::RegistryDeprecated,
            _ => Self::Unknown,
        }
    }

    /// Whether the event is scoped to one project (its second topic is the id).
    pub fn is_project_scoped(&self) -> bool {
        !matches!(
            self,
            Self::RegistryPaused | Self::RegistryUnpaused | Self::RegistryDeprecated | Self::Unknown
        )
    }
}

/// A decoded registry event, ready to be stored.
///
/// `actor` is the owner, contributor, administrator or successor address
/// depending on the kind; `amount` is the goal for `created`, the running
/// total for `target` and the moved value otherwise. Amounts stay decimal
/// strings because they are `i128` on chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundraiserEvent {
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
