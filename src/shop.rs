//! Power-up shop
//!
//! Purchases debit the account and bump the owned count in one store write.
//! Shop money goes to the house, never the pot.

use crate::store::{Account, AccountStore, StoreError};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUp {
    /// Extra mid-air jump charge (owned count; runs grant one per landing
    /// regardless)
    DoubleJump,
    /// One shield activation, carried across runs
    Shield,
}

impl PowerUp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUp::DoubleJump => "double jump",
            PowerUp::Shield => "shield",
        }
    }

    pub fn price(&self, tuning: &Tuning) -> u64 {
        match self {
            PowerUp::DoubleJump => tuning.double_jump_cost,
            PowerUp::Shield => tuning.shield_cost,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    #[error("no account named {0:?}")]
    UnknownAccount(String),
    #[error("balance {balance} can't cover price {price}")]
    InsufficientFunds { balance: u64, price: u64 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Buy one power-up for `name`. Returns the updated account on success;
/// on any error the stored record is untouched.
pub fn purchase(
    store: &mut dyn AccountStore,
    name: &str,
    item: PowerUp,
    tuning: &Tuning,
) -> Result<Account, ShopError> {
    let Some(mut account) = store.get(name)? else {
        return Err(ShopError::UnknownAccount(name.to_string()));
    };

    let price = item.price(tuning);
    if account.balance < price {
        return Err(ShopError::InsufficientFunds { balance: account.balance, price });
    }

    account.balance -= price;
    match item {
        PowerUp::DoubleJump => account.double_jumps += 1,
        PowerUp::Shield => account.shields += 1,
    }
    store.update(&account)?;

    log::info!(
        "{} bought a {} for {}, balance now {}",
        name,
        item.as_str(),
        price,
        account.balance
    );
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryAccounts;

    #[test]
    fn test_purchase_debits_and_grants() {
        let mut store = MemoryAccounts::new();
        store.create("alice", 100).unwrap();
        let tuning = Tuning::default();

        let acct = purchase(&mut store, "alice", PowerUp::Shield, &tuning).unwrap();
        assert_eq!(acct.balance, 85);
        assert_eq!(acct.shields, 1);

        let stored = store.get("alice").unwrap().unwrap();
        assert_eq!(stored, acct);

        let acct = purchase(&mut store, "alice", PowerUp::DoubleJump, &tuning).unwrap();
        assert_eq!(acct.balance, 80);
        assert_eq!(acct.double_jumps, 1);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let mut store = MemoryAccounts::new();
        store.create("poor", 4).unwrap();
        let tuning = Tuning::default();

        let err = purchase(&mut store, "poor", PowerUp::DoubleJump, &tuning).unwrap_err();
        assert!(matches!(err, ShopError::InsufficientFunds { balance: 4, price: 5 }));

        let stored = store.get("poor").unwrap().unwrap();
        assert_eq!(stored.balance, 4);
        assert_eq!(stored.double_jumps, 0);
    }

    #[test]
    fn test_unknown_account() {
        let mut store = MemoryAccounts::new();
        let tuning = Tuning::default();
        let err = purchase(&mut store, "nobody", PowerUp::Shield, &tuning).unwrap_err();
        assert!(matches!(err, ShopError::UnknownAccount(_)));
    }

    #[test]
    fn test_store_failure_surfaces_and_changes_nothing() {
        let mut store = MemoryAccounts::new();
        store.create("alice", 100).unwrap();
        let tuning = Tuning::default();

        store.fail_next();
        let err = purchase(&mut store, "alice", PowerUp::Shield, &tuning).unwrap_err();
        assert!(matches!(err, ShopError::Store(_)));

        let stored = store.get("alice").unwrap().unwrap();
        assert_eq!(stored.balance, 100);
        assert_eq!(stored.shields, 0);
    }
}
