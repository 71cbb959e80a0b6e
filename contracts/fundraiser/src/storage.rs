//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the fundraiser.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type             | Description                       |
//! |----------------|------------------|-----------------------------------|
//! | `Admin`        | `Address`        | Administrator fixed at `init`     |
//! | `Token`        | `Address`        | Token contract funds move through |
//! | `ProjectCount` | `u64`            | Length of the project arena       |
//! | `Paused`       | `bool`           | Manual pause flag                 |
//! | `Status`       | `RegistryStatus` | Active or deprecated              |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                     | Type            | Description                    |
//! |-------------------------|-----------------|--------------------------------|
//! | `ProjConfig(id)`        | `ProjectConfig` | Immutable project config       |
//! | `ProjState(id)`         | `ProjectState`  | Raised amount and flags        |
//! | `ProjLink(id)`          | `String`        | Owner-editable description     |
//! | `Contribution(id, who)` | `i128`          | Stake of one contributor       |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Project ids are dense: an id names a project iff it is below
//! `ProjectCount`. Entries are never removed, and a refunded stake is
//! stored as `0` rather than deleted.

use soroban_sdk::{contracttype, Address, Env, String};

use crate::types::{Project, ProjectConfig, ProjectState, RegistryStatus};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Administrator address (Instance).
    Admin,
    /// Token contract address (Instance).
    Token,
    /// Number of projects ever created (Instance).
    ProjectCount,
    /// Manual pause flag (Instance).
    Paused,
    /// Active / Deprecated(successor) (Instance).
    Status,
    /// Immutable project configuration keyed by ID (Persistent).
    ProjConfig(u64),
    /// Mutable project state keyed by ID (Persistent).
    ProjState(u64),
    /// Description link keyed by ID (Persistent).
    ProjLink(u64),
    /// Amount contributed by an address to a project (Persistent).
    Contribution(u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

/// Write the deployment configuration and the initial registry flags.
pub fn init_registry(env: &Env, admin: &Address, token: &Address) {
    let instance = env.storage().instance();
    instance.set(&DataKey::Admin, admin);
    instance.set(&DataKey::Token, token);
    instance.set(&DataKey::ProjectCount, &0u64);
    instance.set(&DataKey::Paused, &false);
    instance.set(&DataKey::Status, &RegistryStatus::Active);
    bump_instance(env);
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn get_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub fn is_paused(env: &Env) -> bool {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
    bump_instance(env);
}

pub fn get_status(env: &Env) -> Result<RegistryStatus, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Status)
        .ok_or(Error::NotInitialized)
}

pub fn set_status(env: &Env, status: &RegistryStatus) {
    env.storage().instance().set(&DataKey::Status, status);
    bump_instance(env);
}

pub fn get_project_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

/// Reads, increments, and stores the project counter.
/// Returns the ID to use for the *current* project (pre-increment value).
pub fn get_and_increment_project_id(env: &Env) -> Result<u64, Error> {
    let current = get_project_count(env);
    let next = current.checked_add(1).ok_or(Error::Overflow)?;
    env.storage()
        .instance()
        .set(&DataKey::ProjectCount, &next);
    bump_instance(env);
    Ok(current)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Fails with `ProjectNotFound` unless `id` is inside the arena.
pub fn require_project(env: &Env, id: u64) -> Result<(), Error> {
    if id < get_project_count(env) {
        Ok(())
    } else {
        Err(Error::ProjectNotFound)
    }
}

/// Save the config, initial state and description link of a new project.
pub fn save_project(env: &Env, project: &Project) {
    let config = ProjectConfig {
        id: project.id,
        owner: project.owner.clone(),
        name: project.name.clone(),
        goal: project.goal,
        deadline: project.deadline,
    };

    let state = ProjectState {
        amount_raised: project.amount_raised,
        target_reached_notified: project.target_reached_notified,
        funds_claimed: project.funds_claimed,
    };

    let config_key = DataKey::ProjConfig(project.id);
    env.storage().persistent().set(&config_key, &config);
    bump_persistent(env, &config_key);

    save_project_state(env, project.id, &state);
    save_description_link(env, project.id, &project.description_link);
}

/// Load the full `Project` by combining every entry.
pub fn load_project(env: &Env, id: u64) -> Result<Project, Error> {
    let config = load_project_config(env, id)?;
    let state = load_project_state(env, id)?;
    let description_link = load_description_link(env, id)?;
    Ok(Project {
        id: config.id,
        owner: config.owner,
        name: config.name,
        goal: config.goal,
        deadline: config.deadline,
        description_link,
        amount_raised: state.amount_raised,
        target_reached_notified: state.target_reached_notified,
        funds_claimed: state.funds_claimed,
    })
}

/// Load config and state together, the pair every mutating path needs.
pub fn load_project_pair(env: &Env, id: u64) -> Result<(ProjectConfig, ProjectState), Error> {
    Ok((load_project_config(env, id)?, load_project_state(env, id)?))
}

pub fn load_project_config(env: &Env, id: u64) -> Result<ProjectConfig, Error> {
    require_project(env, id)?;
    let key = DataKey::ProjConfig(id);
    let config: ProjectConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

pub fn load_project_state(env: &Env, id: u64) -> Result<ProjectState, Error> {
    require_project(env, id)?;
    let key = DataKey::ProjState(id);
    let state: ProjectState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

/// Save only the mutable project state.
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    let key = DataKey::ProjState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

pub fn load_description_link(env: &Env, id: u64) -> Result<String, Error> {
    require_project(env, id)?;
    let key = DataKey::ProjLink(id);
    let link: String = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(link)
}

pub fn save_description_link(env: &Env, id: u64, link: &String) {
    let key = DataKey::ProjLink(id);
    env.storage().persistent().set(&key, link);
    bump_persistent(env, &key);
}

// ── Contribution Helpers ─────────────────────────────────────────────

/// Stake of `contributor` in project `id`; `0` if they never contributed.
pub fn get_contribution(env: &Env, id: u64, contributor: &Address) -> i128 {
    let key = DataKey::Contribution(id, contributor.clone());
    match env.storage().persistent().get::<DataKey, i128>(&key) {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

/// Add `amount` to a stake and return the new stake.
pub fn add_contribution(
    env: &Env,
    id: u64,
    contributor: &Address,
    amount: i128,
) -> Result<i128, Error> {
    let key = DataKey::Contribution(id, contributor.clone());
    let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    let updated = current.checked_add(amount).ok_or(Error::Overflow)?;
    env.storage().persistent().set(&key, &updated);
    bump_persistent(env, &key);
    Ok(updated)
}

/// Zero a stake and return what it held. The entry is kept so a second
/// refund reads `0`.
pub fn drain_contribution(env: &Env, id: u64, contributor: &Address) -> i128 {
    let key = DataKey::Contribution(id, contributor.clone());
    let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    env.storage().persistent().set(&key, &0i128);
    bump_persistent(env, &key);
    current
}
