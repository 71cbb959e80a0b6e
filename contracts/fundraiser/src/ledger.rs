//! Narrow capability over the token contract that holds contributed value.
//!
//! The registry never grants allowances. It pulls contributions with
//! `transfer_from` (spending the allowance the contributor granted it) and
//! pays out settlements with `transfer` from its own balance. Both calls go
//! through the client's `try_` variants so a rejection by the token becomes
//! [`Error::InsufficientAllowanceOrBalance`] instead of aborting the host;
//! the failed sub-call is rolled back by the host either way.

use soroban_sdk::{token, Address, Env};

use crate::storage;
use crate::Error;

pub struct ValueLedger<'a> {
    client: token::Client<'a>,
    registry: Address,
}

impl<'a> ValueLedger<'a> {
    /// Bind to the token configured at `init`.
    pub fn from_config(env: &Env) -> Result<Self, Error> {
        let token = storage::get_token(env)?;
        Ok(ValueLedger {
            client: token::Client::new(env, &token),
            registry: env.current_contract_address(),
        })
    }

    /// Move `amount` from `payer` into the registry.
    pub fn pull(&self, payer: &Address, amount: i128) -> Result<(), Error> {
        match self
            .client
            .try_transfer_from(&self.registry, payer, &self.registry, &amount)
        {
            Ok(Ok(())) => Ok(()),
            _ => Err(Error::InsufficientAllowanceOrBalance),
        }
    }

    /// Move `amount` out of the registry to `payee`.
    pub fn push(&self, payee: &Address, amount: i128) -> Result<(), Error> {
        match self.client.try_transfer(&self.registry, payee, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(Error::InsufficientAllowanceOrBalance),
        }
    }

    pub fn balance_of(&self, who: &Address) -> i128 {
        self.client.balance(who)
    }

    pub fn registry_balance(&self) -> i128 {
        self.balance_of(&self.registry)
    }
}
