//! # Types
//!
//! Shared data structures used across the fundraiser contract.
//!
//! ## Config / State split
//!
//! A `Project` is stored as several ledger entries:
//!
//! - [`ProjectConfig`]: written once by `apply_for_funding`; never mutated.
//! - [`ProjectState`]: written on every contribution and settlement.
//! - the description link, kept in its own entry because only the owner
//!   ever rewrites it and it is the only unbounded mutable field.
//!
//! Per-contributor stakes live under their own keys (see `storage`).
//! The public API exposes the reconstructed [`Project`] struct.
//!
//! ## Registry status
//!
//! [`RegistryStatus`] is forward-only:
//!
//! ```text
//! Active ──► Deprecated(successor)
//! ```

use soroban_sdk::{contracttype, Address, String};

/// Longest funding window accepted by `apply_for_funding`: six months.
pub const MAX_DURATION_MINUTES: u64 = 262_800;

pub const SECONDS_PER_MINUTE: u64 = 60;

/// Whether the registry still accepts new work.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegistryStatus {
    /// Accepting new projects and contributions.
    Active,
    /// Replaced by the given registry. Settlement of existing funds stays open.
    Deprecated(Address),
}

impl RegistryStatus {
    pub fn is_deprecated(&self) -> bool {
        matches!(self, RegistryStatus::Deprecated(_))
    }

    pub fn successor(&self) -> Option<Address> {
        match self {
            RegistryStatus::Active => None,
            RegistryStatus::Deprecated(next) => Some(next.clone()),
        }
    }
}

/// Immutable project configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub owner: Address,
    pub name: String,
    pub goal: i128,
    pub deadline: u64,
}

/// Mutable project state, updated on contributions and settlement.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub amount_raised: i128,
    pub target_reached_notified: bool,
    pub funds_claimed: bool,
}

impl ProjectState {
    pub fn goal_reached(&self, goal: i128) -> bool {
        self.amount_raised >= goal
    }
}

/// Full representation of a funding project.
///
/// Used as the public API return type; reconstructed from the split
/// storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Dense, 0-based identifier.
    pub id: u64,
    /// Creator of the project; receives the funds on a successful claim.
    pub owner: Address,
    /// Display name.
    pub name: String,
    /// Target amount in token units.
    pub goal: i128,
    /// Ledger timestamp at which the funding window closes.
    pub deadline: u64,
    /// Link to the project's description (whitepaper, site, ...).
    pub description_link: String,
    /// Contributions held for this project and not yet settled.
    pub amount_raised: i128,
    /// Set the first time `amount_raised` reached `goal`.
    pub target_reached_notified: bool,
    /// Set once the owner has claimed the raised funds.
    pub funds_claimed: bool,
}
