//! In-memory account storage
//!
//! The store owns every [`Account`] record. Callers only ever receive
//! snapshots; mutation goes through [`AccountStore::update`] and
//! [`AccountStore::update_pair`], which run a closure against working copies
//! and write them back only if the closure succeeds.
//!
//! The store is internally synchronized so concurrent calls are memory-safe,
//! but it enforces no per-account discipline: callers must hold the account's
//! [`KeyedLock`](crate::lock::KeyedLock) guard across read-modify-write cycles.

use crate::{
    types::{Account, AccountId},
    Error, Result,
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;

struct Inner {
    accounts: HashMap<AccountId, Account>,
    next_id: u64,
}

/// Account storage
pub struct AccountStore {
    inner: RwLock<Inner>,
}

impl AccountStore {
    /// Create an empty store; the first account gets id 1
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                accounts: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Create an account with the given opening balance
    pub fn create(&self, initial_balance: Decimal) -> Result<Account> {
        if initial_balance < Decimal::ZERO {
            return Err(Error::InvalidArgument(
                "Initial balance must not be negative".to_string(),
            ));
        }

        let mut inner = self.inner.write();
        let id = AccountId::new(inner.next_id);
        inner.next_id += 1;

        let account = Account::new(id, initial_balance);
        inner.accounts.insert(id, account.clone());
        Ok(account)
    }

    /// Look up an account snapshot
    pub fn find(&self, id: AccountId) -> Option<Account> {
        self.inner.read().accounts.get(&id).cloned()
    }

    /// Apply `f` to one account; nothing is written if `f` fails
    pub fn update<F>(&self, id: AccountId, f: F) -> Result<Account>
    where
        F: FnOnce(&mut Account) -> Result<()>,
    {
        let mut inner = self.inner.write();
        let slot = inner
            .accounts
            .get_mut(&id)
            .ok_or_else(Error::account_not_found)?;

        let mut working = slot.clone();
        f(&mut working)?;
        *slot = working.clone();
        Ok(working)
    }

    /// Apply `f` to two distinct accounts in one critical section; both are
    /// written back together or not at all
    pub fn update_pair<F>(&self, a: AccountId, b: AccountId, f: F) -> Result<(Account, Account)>
    where
        F: FnOnce(&mut Account, &mut Account) -> Result<()>,
    {
        if a == b {
            return Err(Error::InvalidArgument(
                "Cannot transfer to the same account".to_string(),
            ));
        }

        let mut inner = self.inner.write();
        let (mut first, mut second) = match (inner.accounts.get(&a), inner.accounts.get(&b)) {
            (Some(first), Some(second)) => (first.clone(), second.clone()),
            _ => return Err(Error::accounts_not_found()),
        };

        f(&mut first, &mut second)?;
        inner.accounts.insert(a, first.clone());
        inner.accounts.insert(b, second.clone());
        Ok((first, second))
    }

    /// All accounts ordered by id
    pub fn list(&self) -> Vec<Account> {
        let mut accounts: Vec<_> = self.inner.read().accounts.values().cloned().collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.inner.read().accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
