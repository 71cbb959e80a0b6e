//! Events published by the fundraiser contract.
//!
//! Project events carry `(symbol, project_id)` topics and a typed data
//! struct. Administrative events carry a single symbol topic and an
//! `Address` payload.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub owner: Address,
    pub goal: i128,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectFunded {
    pub project_id: u64,
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectTargetReached {
    pub project_id: u64,
    pub amount_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsClaimed {
    pub project_id: u64,
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsRefunded {
    pub project_id: u64,
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DescriptionChanged {
    pub project_id: u64,
    pub owner: Address,
}

pub fn emit_project_created(env: &Env, project_id: u64, owner: Address, goal: i128, deadline: u64) {
    env.events().publish(
        (symbol_short!("created"), project_id),
        ProjectCreated {
            project_id,
            owner,
            goal,
            deadline,
        },
    );
}

pub fn emit_project_funded(env: &Env, project_id: u64, contributor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("funded"), project_id),
        ProjectFunded {
            project_id,
            contributor,
            amount,
        },
    );
}

pub fn emit_project_target_reached(env: &Env, project_id: u64, amount_raised: i128) {
    env.events().publish(
        (symbol_short!("target"), project_id),
        ProjectTargetReached {
            project_id,
            amount_raised,
        },
    );
}

pub fn emit_funds_claimed(env: &Env, project_id: u64, owner: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("claimed"), project_id),
        FundsClaimed {
            project_id,
            owner,
            amount,
        },
    );
}

pub fn emit_funds_refunded(env: &Env, project_id: u64, contributor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("refunded"), project_id),
        FundsRefunded {
            project_id,
            contributor,
            amount,
        },
    );
}

pub fn emit_description_changed(env: &Env, project_id: u64, owner: Address) {
    env.events().publish(
        (symbol_short!("desc_set"), project_id),
        DescriptionChanged { project_id, owner },
    );
}

pub fn emit_registry_paused(env: &Env, admin: Address) {
    env.events().publish((symbol_short!("paused"),), admin);
}

pub fn emit_registry_unpaused(env: &Env, admin: Address) {
    env.events().publish((symbol_short!("unpaused"),), admin);
}

pub fn emit_registry_deprecated(env: &Env, successor: Address) {
    env.events()
        .publish((Symbol::new(env, "deprecated"),), successor);
}
