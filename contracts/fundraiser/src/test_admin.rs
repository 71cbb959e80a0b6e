extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};

use crate::invariants::assert_registry_solvent;
use crate::{Error, Fundraiser, FundraiserClient};

struct Registry {
    env: Env,
    client: FundraiserClient<'static>,
    token: token::Client<'static>,
    admin: Address,
    owner: Address,
}

impl Registry {
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        let client = FundraiserClient::new(&env, &env.register(Fundraiser, ()));
        let admin = Address::generate(&env);
        let sac = env.register_stellar_asset_contract_v2(admin.clone());
        let token = token::Client::new(&env, &sac.address());
        client.init(&admin, &token.address);
        let owner = Address::generate(&env);
        Registry {
            env,
            client,
            token,
            admin,
            owner,
        }
    }

    fn apply(&self, goal: i128, minutes: u64) -> Result<u64, Error> {
        match self.client.try_apply_for_funding(
            &self.owner,
            &String::from_str(&self.env, "should fail"),
            &goal,
            &minutes,
            &String::from_str(&self.env, ""),
        ) {
            Ok(Ok(id)) => Ok(id),
            Err(Ok(err)) => Err(err),
            other => panic!("unexpected host failure: {:?}", other),
        }
    }

    fn contributor(&self, amount: i128) -> Address {
        let who = Address::generate(&self.env);
        token::StellarAssetClient::new(&self.env, &self.token.address).mint(&who, &amount);
        self.token.approve(
            &who,
            &self.client.address,
            &amount,
            &(self.env.ledger().sequence() + 1_000),
        );
        who
    }
}

// ── Pause ────────────────────────────────────────────────────────────

#[test]
fn test_pause_is_administrator_only() {
    let r = Registry::new();
    let intruder = Address::generate(&r.env);

    assert!(!r.client.is_paused());
    assert_eq!(r.client.try_pause(&intruder), Err(Ok(Error::NotAdministrator)));
    assert_eq!(r.client.try_unpause(&intruder), Err(Ok(Error::NotAdministrator)));
    assert!(!r.client.is_paused());

    r.client.pause(&r.admin);
    assert!(r.client.is_paused());
}

#[test]
fn test_pause_blocks_new_work_and_unpause_restores_it() {
    let r = Registry::new();
    let id = r.apply(10, 2_000).unwrap();
    let contributor = r.contributor(5);

    r.client.pause(&r.admin);
    assert_eq!(
        r.client.try_contribute(&contributor, &id, &1),
        Err(Ok(Error::ContractUnavailable))
    );
    assert_eq!(r.apply(10, 2_000), Err(Error::ContractUnavailable));
    // Availability is checked before any argument.
    assert_eq!(r.apply(0, 0), Err(Error::ContractUnavailable));
    assert_eq!(
        r.client.try_contribute(&contributor, &999, &0),
        Err(Ok(Error::ContractUnavailable))
    );

    r.client.unpause(&r.admin);
    assert!(!r.client.is_paused());
    r.client.contribute(&contributor, &id, &1);
    assert_eq!(r.apply(10, 2_000), Ok(1));
    assert_eq!(r.client.get_amount_raised_of(&id), 1);
}

#[test]
fn test_settlement_and_metadata_stay_open_while_paused() {
    let r = Registry::new();
    let goal_met = r.apply(4, 1).unwrap();
    let under_goal = r.apply(100, 1).unwrap();
    let contributor = r.contributor(10);
    r.client.contribute(&contributor, &goal_met, &4);
    r.client.contribute(&contributor, &under_goal, &3);

    r.client.pause(&r.admin);
    r.env.ledger().with_mut(|li| li.timestamp += 120);

    r.client.take_funds_of(&r.owner, &goal_met);
    assert_eq!(r.token.balance(&r.owner), 4);

    r.client.withdraw(&contributor, &under_goal);
    assert_eq!(r.token.balance(&contributor), 6);

    r.client
        .change_description_link_of(&r.owner, &under_goal, &String::from_str(&r.env, "moved"));
    assert_eq!(
        r.client.description_link_of(&under_goal),
        String::from_str(&r.env, "moved")
    );
    assert_registry_solvent(&r.client);
}

// ── Deprecation ──────────────────────────────────────────────────────

#[test]
fn test_deprecation_blocks_new_work_but_not_refunds() {
    let r = Registry::new();
    let other = r.contributor(20);
    let contributor = r.contributor(20);
    r.apply(10, 1).unwrap();
    let id = r.apply(10, 2).unwrap();
    r.client.contribute(&contributor, &id, &2);
    r.client.contribute(&contributor, &id, &2);
    r.client.contribute(&other, &id, &1);

    r.env.ledger().with_mut(|li| li.timestamp += 5 * 60);
    assert!(!r.client.is_contract_deprecated());

    let successor = Address::generate(&r.env);
    r.client.set_next_fundraiser(&r.admin, &successor);

    assert_eq!(
        r.client.try_is_contract_deprecated(),
        Err(Ok(Error::RegistryDeprecated))
    );
    assert_eq!(r.client.get_next_fundraiser(), Some(successor));
    assert_eq!(r.apply(10, 2_000), Err(Error::ContractUnavailable));
    assert_eq!(
        r.client.try_contribute(&contributor, &id, &1),
        Err(Ok(Error::ContractUnavailable))
    );

    let stake = r.client.get_contribution_of(&id, &contributor);
    let balance = r.token.balance(&contributor);
    r.client.withdraw(&contributor, &id);

    assert_eq!(stake, 4);
    assert_eq!(r.token.balance(&contributor), balance + stake);
    assert_eq!(r.client.get_amount_raised_of(&id), 1);
    assert_registry_solvent(&r.client);
}

#[test]
fn test_deprecation_is_one_way() {
    let r = Registry::new();
    let first = Address::generate(&r.env);
    let second = Address::generate(&r.env);

    r.client.set_next_fundraiser(&r.admin, &first);
    assert_eq!(
        r.client.try_set_next_fundraiser(&r.admin, &second),
        Err(Ok(Error::RegistryDeprecated))
    );
    assert_eq!(r.client.get_next_fundraiser(), Some(first));

    // Pausing and unpausing does not revive a deprecated registry.
    r.client.pause(&r.admin);
    r.client.unpause(&r.admin);
    assert!(!r.client.is_paused());
    assert_eq!(r.apply(10, 60), Err(Error::ContractUnavailable));
}

#[test]
fn test_set_next_fundraiser_is_administrator_only() {
    let r = Registry::new();
    let intruder = Address::generate(&r.env);

    assert_eq!(
        r.client.try_set_next_fundraiser(&intruder, &intruder),
        Err(Ok(Error::NotAdministrator))
    );
    assert!(!r.client.is_contract_deprecated());
    assert_eq!(r.client.get_next_fundraiser(), None);
}

#[test]
fn test_owner_can_still_claim_after_deprecation() {
    let r = Registry::new();
    let id = r.apply(5, 2_000).unwrap();
    let contributor = r.contributor(5);
    r.client.contribute(&contributor, &id, &5);

    r.client
        .set_next_fundraiser(&r.admin, &Address::generate(&r.env));

    assert!(r.client.can_i_take_funds_of(&r.owner, &id));
    r.client.take_funds_of(&r.owner, &id);
    assert_eq!(r.token.balance(&r.owner), 5);
    assert_eq!(r.client.get_registry_balance(), 0);
}
