//! # Fundraiser Contract
//!
//! A goal-and-deadline crowdfunding registry. Owners open projects, anyone
//! contributes the registry's token, and each project settles one of two
//! ways: the owner claims everything once the goal is met, or contributors
//! take their own stake back after the deadline.
//!
//! | Phase         | Entry Point(s)                                               |
//! |---------------|--------------------------------------------------------------|
//! | Bootstrap     | [`Fundraiser::init`]                                         |
//! | Registration  | [`Fundraiser::apply_for_funding`]                            |
//! | Funding       | [`Fundraiser::contribute`]                                   |
//! | Owner claim   | `can_i_take_funds_of`, `take_funds_of`                       |
//! | Refund        | `can_i_withdraw`, `withdraw`                                 |
//! | Metadata      | `change_description_link_of`                                 |
//! | Admin         | `pause`, `unpause`, `set_next_fundraiser`                    |
//! | Queries       | `get_project`, `owner_of`, `get_goal_of`, ... (see below)    |
//!
//! ## Architecture
//!
//! The pause/deprecation overlay lives in [`admin`], token movement in
//! [`ledger`], storage access in [`storage`] and event payloads in
//! [`events`]. This file holds the entry points and the lifecycle rules.
//!
//! Every fallible entry point returns `Result<_, Error>`. An `Err` aborts
//! the invocation, so the host discards every write made before it,
//! including a token pull that already succeeded.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, log, Address, Env, String};

mod admin;
pub mod events;
mod ledger;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_admin;
#[cfg(test)]
mod test_ledger;

use ledger::ValueLedger;
use storage::{
    get_and_increment_project_id, load_project, load_project_config, load_project_pair,
    save_project, save_project_state,
};
use types::ProjectState;
pub use types::{Project, RegistryStatus, MAX_DURATION_MINUTES, SECONDS_PER_MINUTE};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    ProjectNotFound = 3,
    InvalidGoal = 4,
    InvalidDuration = 5,
    DurationTooLong = 6,
    InvalidAmount = 7,
    ContractUnavailable = 8,
    RegistryDeprecated = 9,
    NotAdministrator = 10,
    NotProjectOwner = 11,
    GoalNotReached = 12,
    ProjectStillActive = 13,
    NoContribution = 14,
    FundsAlreadyClaimed = 15,
    InsufficientAllowanceOrBalance = 16,
    Overflow = 17,
}

#[contract]
pub struct Fundraiser;

#[contractimpl]
impl Fundraiser {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the registry.
    ///
    /// Must be called exactly once immediately after deployment.
    ///
    /// - `admin` becomes the only address allowed to pause or deprecate the
    ///   registry, and must sign the transaction.
    /// - `token` is the token contract every contribution and payout uses.
    pub fn init(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        storage::init_registry(&env, &admin, &token);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Project lifecycle
    // ─────────────────────────────────────────────────────────

    /// Open a new project owned by `owner` and return its id.
    ///
    /// The funding window closes `duration_minutes` after the current
    /// ledger timestamp and must be between 1 minute and six months.
    pub fn apply_for_funding(
        env: Env,
        owner: Address,
        name: String,
        goal: i128,
        duration_minutes: u64,
        description_link: String,
    ) -> Result<u64, Error> {
        admin::require_available(&env)?;
        owner.require_auth();

        if goal <= 0 {
            return Err(Error::InvalidGoal);
        }
        if duration_minutes < 1 {
            return Err(Error::InvalidDuration);
        }
        if duration_minutes > MAX_DURATION_MINUTES {
            return Err(Error::DurationTooLong);
        }

        let deadline = duration_minutes
            .checked_mul(SECONDS_PER_MINUTE)
            .and_then(|secs| env.ledger().timestamp().checked_add(secs))
            .ok_or(Error::Overflow)?;

        let id = get_and_increment_project_id(&env)?;

        let project = Project {
            id,
            owner: owner.clone(),
            name,
            goal,
            deadline,
            description_link,
            amount_raised: 0,
            target_reached_notified: false,
            funds_claimed: false,
        };
        save_project(&env, &project);

        events::emit_project_created(&env, id, owner, goal, deadline);
        Ok(id)
    }

    /// Contribute `amount` tokens to project `project_id`.
    ///
    /// `contributor` must have approved the registry for at least `amount`
    /// on the token contract. The pull happens before any local write.
    pub fn contribute(
        env: Env,
        contributor: Address,
        project_id: u64,
        amount: i128,
    ) -> Result<(), Error> {
        admin::require_available(&env)?;
        contributor.require_auth();

        let (config, mut state) = load_project_pair(&env, project_id)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if state.funds_claimed {
            return Err(Error::FundsAlreadyClaimed);
        }

        ValueLedger::from_config(&env)?.pull(&contributor, amount)?;

        storage::add_contribution(&env, project_id, &contributor, amount)?;
        state.amount_raised = state
            .amount_raised
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        events::emit_project_funded(&env, project_id, contributor, amount);

        // Refunds can drop a project back below its goal; the notification
        // still fires only once per project.
        if state.goal_reached(config.goal) && !state.target_reached_notified {
            state.target_reached_notified = true;
            events::emit_project_target_reached(&env, project_id, state.amount_raised);
        }

        save_project_state(&env, project_id, &state);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Owner claim
    // ─────────────────────────────────────────────────────────

    /// Return whether `caller`, who must own the project, can claim its funds.
    pub fn can_i_take_funds_of(env: Env, caller: Address, project_id: u64) -> Result<bool, Error> {
        let (config, state) = load_project_pair(&env, project_id)?;
        if caller != config.owner {
            return Err(Error::NotProjectOwner);
        }
        Ok(state.goal_reached(config.goal))
    }

    /// Pay everything raised by a project that met its goal to its owner.
    ///
    /// Works before or after the deadline, and stays open while the
    /// registry is paused or deprecated.
    pub fn take_funds_of(env: Env, caller: Address, project_id: u64) -> Result<(), Error> {
        caller.require_auth();
        let (config, mut state) = load_project_pair(&env, project_id)?;

        if caller != config.owner {
            return Err(Error::NotProjectOwner);
        }
        if !state.goal_reached(config.goal) {
            return Err(Error::GoalNotReached);
        }

        let amount = state.amount_raised;
        ValueLedger::from_config(&env)?.push(&config.owner, amount)?;

        state.amount_raised = 0;
        state.funds_claimed = true;
        save_project_state(&env, project_id, &state);

        log!(&env, "project {} claimed {} by owner", project_id, amount);
        events::emit_funds_claimed(&env, project_id, config.owner, amount);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Contributor refund
    // ─────────────────────────────────────────────────────────

    /// Return `true` if `caller` may take their stake back from the project.
    ///
    /// Fails with the reason otherwise: the caller has nothing staked, the
    /// window is still open, or the owner already claimed the funds.
    pub fn can_i_withdraw(env: Env, caller: Address, project_id: u64) -> Result<bool, Error> {
        Self::refundable_stake(&env, &caller, project_id).map(|_| true)
    }

    /// Return the caller's full stake to them once the deadline has passed.
    ///
    /// Goal status is not consulted, and the call stays open while the
    /// registry is paused or deprecated.
    pub fn withdraw(env: Env, caller: Address, project_id: u64) -> Result<(), Error> {
        caller.require_auth();
        let (mut state, _) = Self::refundable_stake(&env, &caller, project_id)?;

        let amount = storage::drain_contribution(&env, project_id, &caller);
        state.amount_raised = state
            .amount_raised
            .checked_sub(amount)
            .filter(|left| *left >= 0)
            .ok_or(Error::Overflow)?;

        ValueLedger::from_config(&env)?.push(&caller, amount)?;
        save_project_state(&env, project_id, &state);

        log!(&env, "project {} refunded {}", project_id, amount);
        events::emit_funds_refunded(&env, project_id, caller, amount);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Metadata
    // ─────────────────────────────────────────────────────────

    /// Replace the description link of a project. Owner only.
    pub fn change_description_link_of(
        env: Env,
        caller: Address,
        project_id: u64,
        description_link: String,
    ) -> Result<(), Error> {
        caller.require_auth();
        let config = load_project_config(&env, project_id)?;
        if caller != config.owner {
            return Err(Error::NotProjectOwner);
        }
        storage::save_description_link(&env, project_id, &description_link);
        events::emit_description_changed(&env, project_id, caller);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Administration
    // ─────────────────────────────────────────────────────────

    /// Stop new projects and contributions. Administrator only.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        admin::pause(&env, &caller)
    }

    /// Lift a pause. Administrator only. Does not undo deprecation.
    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        admin::unpause(&env, &caller)
    }

    /// Retire this registry in favour of `successor`. Administrator only,
    /// and only once.
    pub fn set_next_fundraiser(env: Env, caller: Address, successor: Address) -> Result<(), Error> {
        caller.require_auth();
        admin::deprecate(&env, &caller, successor)
    }

    /// `false` while the registry is active; fails with
    /// `RegistryDeprecated` once a successor has been set.
    pub fn is_contract_deprecated(env: Env) -> Result<bool, Error> {
        admin::check_not_deprecated(&env)
    }

    /// Return the successor registry, if one has been set.
    pub fn get_next_fundraiser(env: Env) -> Result<Option<Address>, Error> {
        Ok(storage::get_status(&env)?.successor())
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    pub fn get_administrator(env: Env) -> Result<Address, Error> {
        storage::get_admin(&env)
    }

    pub fn get_token_address(env: Env) -> Result<Address, Error> {
        storage::get_token(&env)
    }

    /// Tokens currently held by the registry across all projects.
    pub fn get_registry_balance(env: Env) -> Result<i128, Error> {
        Ok(ValueLedger::from_config(&env)?.registry_balance())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_project_count(env: Env) -> u64 {
        storage::get_project_count(&env)
    }

    /// Retrieve a project by its ID.
    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        load_project(&env, project_id)
    }

    pub fn owner_of(env: Env, project_id: u64) -> Result<Address, Error> {
        Ok(load_project_config(&env, project_id)?.owner)
    }

    pub fn get_project_name_of(env: Env, project_id: u64) -> Result<String, Error> {
        Ok(load_project_config(&env, project_id)?.name)
    }

    pub fn get_goal_of(env: Env, project_id: u64) -> Result<i128, Error> {
        Ok(load_project_config(&env, project_id)?.goal)
    }

    pub fn get_deadline_of(env: Env, project_id: u64) -> Result<u64, Error> {
        Ok(load_project_config(&env, project_id)?.deadline)
    }

    pub fn description_link_of(env: Env, project_id: u64) -> Result<String, Error> {
        storage::load_description_link(&env, project_id)
    }

    pub fn get_amount_raised_of(env: Env, project_id: u64) -> Result<i128, Error> {
        Ok(storage::load_project_state(&env, project_id)?.amount_raised)
    }

    pub fn is_target_reached_notified(env: Env, project_id: u64) -> Result<bool, Error> {
        Ok(storage::load_project_state(&env, project_id)?.target_reached_notified)
    }

    /// Stake of `contributor` in the project; `0` for non-contributors and
    /// after a refund.
    pub fn get_contribution_of(
        env: Env,
        project_id: u64,
        contributor: Address,
    ) -> Result<i128, Error> {
        storage::require_project(&env, project_id)?;
        Ok(storage::get_contribution(&env, project_id, &contributor))
    }
}

// ─────────────────────────────────────────────────────────
// Internal Helpers
// ─────────────────────────────────────────────────────────

impl Fundraiser {
    /// Checks refund eligibility in order and returns the project state and
    /// the caller's stake on success.
    fn refundable_stake(
        env: &Env,
        caller: &Address,
        project_id: u64,
    ) -> Result<(ProjectState, i128), Error> {
        let (config, state) = load_project_pair(env, project_id)?;
        let stake = storage::get_contribution(env, project_id, caller);
        if stake == 0 {
            return Err(Error::NoContribution);
        }
        if env.ledger().timestamp() < config.deadline {
            return Err(Error::ProjectStillActive);
        }
        if state.funds_claimed {
            return Err(Error::FundsAlreadyClaimed);
        }
        Ok((state, stake))
    }
}
