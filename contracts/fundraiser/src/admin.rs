//! # Administrative overlay
//!
//! A single administrator, fixed at `init`, controls two switches:
//!
//! | Switch      | Set by                | Cleared by | Blocks                      |
//! |-------------|-----------------------|------------|-----------------------------|
//! | `Paused`    | `pause`               | `unpause`  | creation, contribution      |
//! | `Status`    | `set_next_fundraiser` | never      | creation, contribution      |
//!
//! Settlement (owner claim, contributor refund), metadata edits and reads
//! are never gated here: existing funds must stay recoverable after the
//! registry is retired.

use soroban_sdk::{log, Address, Env};

use crate::events;
use crate::storage;
use crate::types::RegistryStatus;
use crate::Error;

/// Fails with `NotAdministrator` unless `caller` is the stored administrator.
pub fn require_administrator(env: &Env, caller: &Address) -> Result<(), Error> {
    let admin = storage::get_admin(env)?;
    if *caller != admin {
        return Err(Error::NotAdministrator);
    }
    Ok(())
}

/// The gate in front of `apply_for_funding` and `contribute`.
pub fn require_available(env: &Env) -> Result<(), Error> {
    let status = storage::get_status(env)?;
    if storage::is_paused(env) || status.is_deprecated() {
        return Err(Error::ContractUnavailable);
    }
    Ok(())
}

pub fn pause(env: &Env, caller: &Address) -> Result<(), Error> {
    require_administrator(env, caller)?;
    storage::set_paused(env, true);
    events::emit_registry_paused(env, caller.clone());
    Ok(())
}

/// Clears the manual flag only; a deprecated registry stays unavailable.
pub fn unpause(env: &Env, caller: &Address) -> Result<(), Error> {
    require_administrator(env, caller)?;
    storage::set_paused(env, false);
    events::emit_registry_unpaused(env, caller.clone());
    Ok(())
}

/// One-way `Active -> Deprecated(successor)` transition.
pub fn deprecate(env: &Env, caller: &Address, successor: Address) -> Result<(), Error> {
    require_administrator(env, caller)?;
    if storage::get_status(env)?.is_deprecated() {
        return Err(Error::RegistryDeprecated);
    }
    log!(env, "registry deprecated in favour of {}", successor);
    storage::set_status(env, &RegistryStatus::Deprecated(successor.clone()));
    events::emit_registry_deprecated(env, successor);
    Ok(())
}

/// `Ok(false)` while active; `Err(RegistryDeprecated)` once retired.
pub fn check_not_deprecated(env: &Env) -> Result<bool, Error> {
    match storage::get_status(env)? {
        RegistryStatus::Active => Ok(false),
        RegistryStatus::Deprecated(_) => Err(Error::RegistryDeprecated),
    }
}
