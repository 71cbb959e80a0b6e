extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};

use crate::invariants::assert_registry_solvent;
use crate::{Error, Fundraiser, FundraiserClient};

/// Token stand-in that refuses every pull.
mod rejecting {
    use soroban_sdk::{contract, contracterror, contractimpl, Address, Env};

    #[contracterror]
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    #[repr(u32)]
    pub enum LedgerError {
        Rejected = 1,
    }

    #[contract]
    pub struct RejectingLedger;

    #[contractimpl]
    impl RejectingLedger {
        pub fn transfer_from(
            _env: Env,
            _spender: Address,
            _from: Address,
            _to: Address,
            _amount: i128,
        ) -> Result<(), LedgerError> {
            Err(LedgerError::Rejected)
        }

        pub fn balance(_env: Env, _id: Address) -> i128 {
            0
        }
    }
}

/// Token stand-in that accepts pulls without moving anything and refuses
/// every payout, to exercise rollback of settlement.
mod one_way {
    use soroban_sdk::{contract, contracterror, contractimpl, Address, Env};

    #[contracterror]
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    #[repr(u32)]
    pub enum LedgerError {
        Rejected = 1,
    }

    #[contract]
    pub struct OneWayLedger;

    #[contractimpl]
    impl OneWayLedger {
        pub fn transfer_from(_env: Env, _spender: Address, _from: Address, _to: Address, _amount: i128) {}

        pub fn transfer(_env: Env, _from: Address, _to: Address, _amount: i128) -> Result<(), LedgerError> {
            Err(LedgerError::Rejected)
        }

        pub fn balance(_env: Env, _id: Address) -> i128 {
            0
        }
    }
}

fn registry_with_ledger(env: &Env, ledger: &Address) -> FundraiserClient<'static> {
    let client = FundraiserClient::new(env, &env.register(Fundraiser, ()));
    client.init(&Address::generate(env), ledger);
    client
}

fn open_project(env: &Env, client: &FundraiserClient, owner: &Address, goal: i128, minutes: u64) -> u64 {
    client.apply_for_funding(
        owner,
        &String::from_str(env, "ledger"),
        &goal,
        &minutes,
        &String::from_str(env, ""),
    )
}

fn stellar_asset(env: &Env) -> token::Client<'static> {
    let sac = env.register_stellar_asset_contract_v2(Address::generate(env));
    token::Client::new(env, &sac.address())
}

#[test]
fn test_rejected_pull_leaves_no_trace() {
    let env = Env::default();
    env.mock_all_auths();
    let ledger = env.register(rejecting::RejectingLedger, ());
    let client = registry_with_ledger(&env, &ledger);
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    let id = open_project(&env, &client, &owner, 10, 60);

    assert_eq!(
        client.try_contribute(&contributor, &id, &5),
        Err(Ok(Error::InsufficientAllowanceOrBalance))
    );
    assert_eq!(client.get_amount_raised_of(&id), 0);
    assert_eq!(client.get_contribution_of(&id, &contributor), 0);
    assert!(!client.is_target_reached_notified(&id));
    assert_eq!(client.get_registry_balance(), 0);
}

#[test]
fn test_rejected_payout_rolls_back_claim_and_refund() {
    let env = Env::default();
    env.mock_all_auths();
    let ledger = env.register(one_way::OneWayLedger, ());
    let client = registry_with_ledger(&env, &ledger);
    let owner = Address::generate(&env);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    let claimable = open_project(&env, &client, &owner, 5, 1);
    let refundable = open_project(&env, &client, &owner, 50, 1);

    client.contribute(&alice, &claimable, &5);
    client.contribute(&bob, &refundable, &7);
    env.ledger().with_mut(|li| li.timestamp += 120);

    assert_eq!(
        client.try_take_funds_of(&owner, &claimable),
        Err(Ok(Error::InsufficientAllowanceOrBalance))
    );
    let project = client.get_project(&claimable);
    assert_eq!(project.amount_raised, 5);
    assert!(!project.funds_claimed);

    assert_eq!(
        client.try_withdraw(&bob, &refundable),
        Err(Ok(Error::InsufficientAllowanceOrBalance))
    );
    assert_eq!(client.get_contribution_of(&refundable, &bob), 7);
    assert_eq!(client.get_amount_raised_of(&refundable), 7);
}

#[test]
fn test_contribution_without_allowance_is_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let token = stellar_asset(&env);
    let client = registry_with_ledger(&env, &token.address);
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    token::StellarAssetClient::new(&env, &token.address).mint(&contributor, &20);
    let id = open_project(&env, &client, &owner, 10, 60);

    assert_eq!(
        client.try_contribute(&contributor, &id, &2),
        Err(Ok(Error::InsufficientAllowanceOrBalance))
    );
    assert_eq!(token.balance(&contributor), 20);
    assert_eq!(client.get_amount_raised_of(&id), 0);
}

#[test]
fn test_contribution_beyond_balance_or_allowance_is_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let token = stellar_asset(&env);
    let client = registry_with_ledger(&env, &token.address);
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    token::StellarAssetClient::new(&env, &token.address).mint(&contributor, &3);
    let expiration = env.ledger().sequence() + 1_000;
    token.approve(&contributor, &client.address, &10, &expiration);
    let id = open_project(&env, &client, &owner, 10, 60);

    // Allowance covers it, balance does not.
    assert_eq!(
        client.try_contribute(&contributor, &id, &5),
        Err(Ok(Error::InsufficientAllowanceOrBalance))
    );

    client.contribute(&contributor, &id, &3);
    token::StellarAssetClient::new(&env, &token.address).mint(&contributor, &20);

    // Balance covers it, the remaining allowance (7) does not.
    assert_eq!(
        client.try_contribute(&contributor, &id, &8),
        Err(Ok(Error::InsufficientAllowanceOrBalance))
    );
    assert_eq!(client.get_contribution_of(&id, &contributor), 3);
    assert_eq!(token.allowance(&contributor, &client.address), 7);
}

#[test]
fn test_registry_balance_tracks_open_projects() {
    let env = Env::default();
    env.mock_all_auths();
    let token = stellar_asset(&env);
    let client = registry_with_ledger(&env, &token.address);
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    token::StellarAssetClient::new(&env, &token.address).mint(&contributor, &100);
    let expiration = env.ledger().sequence() + 1_000;
    token.approve(&contributor, &client.address, &100, &expiration);

    let a = open_project(&env, &client, &owner, 10, 1);
    let b = open_project(&env, &client, &owner, 1_000, 1);
    client.contribute(&contributor, &a, &12);
    client.contribute(&contributor, &b, &30);
    assert_eq!(client.get_registry_balance(), 42);
    assert_registry_solvent(&client);

    client.take_funds_of(&owner, &a);
    assert_eq!(client.get_registry_balance(), 30);

    env.ledger().with_mut(|li| li.timestamp += 60);
    client.withdraw(&contributor, &b);
    assert_eq!(client.get_registry_balance(), 0);
    assert_eq!(token.balance(&contributor), 88);
    assert_eq!(token.balance(&owner), 12);
    assert_registry_solvent(&client);
}
