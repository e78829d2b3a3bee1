//! Main ledger orchestration layer
//!
//! This module ties together the account store, the keyed lock table and the
//! retry executor into the high-level account API.
//!
//! Every mutating call follows the same path:
//!
//! ```text
//! Start ─► LockAcquired ─► Validated ─► Committed | Aborted ─► LockReleased ─► Result
//! ```
//!
//! wrapped in [`RetryExecutor::run`]. Reads and creates only carry a deadline.
//!
//! # Example
//!
//! ```
//! use ledger_core::{Config, Ledger};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> ledger_core::Result<()> {
//!     let ledger = Ledger::in_memory(Config::default())?;
//!
//!     let alice = ledger.create_account(Decimal::from(100)).await?;
//!     let bob = ledger.create_account(Decimal::from(50)).await?;
//!     ledger.transfer(alice.id, bob.id, Decimal::from(20)).await?;
//!
//!     assert_eq!(ledger.get_account(bob.id).await?.balance, Decimal::from(70));
//!     Ok(())
//! }
//! ```

use crate::{
    config::AmountPolicy,
    lock::{KeyedLock, KeyedLockGuard},
    metrics::Metrics,
    retry::RetryExecutor,
    store::AccountStore,
    types::{Account, AccountId, Transfer},
    Config, Error, Result,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Main ledger interface
pub struct Ledger {
    /// Account records
    store: Arc<AccountStore>,

    /// Per-account locks
    locks: Arc<KeyedLock>,

    /// Retry/timeout wrapper for mutating operations
    executor: RetryExecutor,

    /// Operation metrics
    metrics: Metrics,

    /// Configuration
    config: Config,
}

impl Ledger {
    /// Build a ledger over explicitly owned storage and lock table
    pub fn new(config: Config, store: Arc<AccountStore>, locks: Arc<KeyedLock>) -> Result<Self> {
        config.validate()?;

        let metrics = Metrics::new()
            .map_err(|e| Error::Config(format!("Failed to register metrics: {}", e)))?;
        let executor = RetryExecutor::new(
            config.retry.clone(),
            Duration::from_millis(config.timeouts.attempt_timeout_ms),
        )
        .with_metrics(metrics.clone());

        Ok(Self {
            store,
            locks,
            executor,
            metrics,
            config,
        })
    }

    /// Ledger with a fresh store and lock table
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::new(
            config,
            Arc::new(AccountStore::new()),
            Arc::new(KeyedLock::new()),
        )
    }

    /// Open a new account
    pub async fn create_account(&self, balance: Decimal) -> Result<Account> {
        let result = self
            .executor
            .with_timeout("create", self.read_timeout(), async {
                self.store.create(balance)
            })
            .await;

        if let Ok(account) = &result {
            info!(account = %account.id, balance = %account.balance, "Account created");
        }
        self.observe("create", result)
    }

    /// Account snapshot
    ///
    /// Takes no lock: the store lookup is atomic, but a concurrent mutation
    /// may land right after the snapshot is taken.
    pub async fn get_account(&self, id: AccountId) -> Result<Account> {
        let result = self
            .executor
            .with_timeout("get", self.read_timeout(), async {
                self.store.find(id).ok_or_else(Error::account_not_found)
            })
            .await;
        self.observe("get", result)
    }

    /// Add `amount` to the balance
    pub async fn deposit(&self, id: AccountId, amount: Decimal) -> Result<Account> {
        if let Err(e) = self.check_amount(amount) {
            return self.observe("deposit", Err(e));
        }

        let result = self
            .executor
            .run("deposit", move || async move {
                let _guard = self.lock(id).await;
                self.store.update(id, |account| {
                    let new_balance = checked(account.balance.checked_add(amount))?;
                    if new_balance < Decimal::ZERO {
                        return Err(Error::InsufficientBalance {
                            account: id,
                            requested: -amount,
                            available: account.balance,
                        });
                    }
                    account.balance = new_balance;
                    Ok(())
                })
            })
            .await;

        if let Ok(account) = &result {
            info!(account = %id, %amount, balance = %account.balance, "Deposit completed");
        }
        self.observe("deposit", result)
    }

    /// Take `amount` from the balance; fails without mutating if funds are short
    pub async fn withdraw(&self, id: AccountId, amount: Decimal) -> Result<Account> {
        if let Err(e) = self.check_amount(amount) {
            return self.observe("withdraw", Err(e));
        }

        let result = self
            .executor
            .run("withdraw", move || async move {
                let _guard = self.lock(id).await;
                self.store.update(id, |account| {
                    if account.balance < amount {
                        return Err(Error::InsufficientBalance {
                            account: id,
                            requested: amount,
                            available: account.balance,
                        });
                    }
                    account.balance = checked(account.balance.checked_sub(amount))?;
                    Ok(())
                })
            })
            .await;

        if let Ok(account) = &result {
            info!(account = %id, %amount, balance = %account.balance, "Withdrawal completed");
        }
        self.observe("withdraw", result)
    }

    /// Move `amount` from one account to another atomically
    pub async fn transfer(&self, from: AccountId, to: AccountId, amount: Decimal) -> Result<Transfer> {
        if from == to {
            return self.observe(
                "transfer",
                Err(Error::InvalidArgument(
                    "Cannot transfer to the same account".to_string(),
                )),
            );
        }
        if let Err(e) = self.check_amount(amount) {
            return self.observe("transfer", Err(e));
        }

        let result = self
            .executor
            .run("transfer", move || async move {
                let _guards = self.lock_pair(from, to).await?;
                self.store.update_pair(from, to, |source, target| {
                    if source.balance < amount {
                        return Err(Error::InsufficientBalance {
                            account: from,
                            requested: amount,
                            available: source.balance,
                        });
                    }
                    let debited = checked(source.balance.checked_sub(amount))?;
                    let credited = checked(target.balance.checked_add(amount))?;
                    if credited < Decimal::ZERO {
                        return Err(Error::InsufficientBalance {
                            account: to,
                            requested: -amount,
                            available: target.balance,
                        });
                    }
                    source.balance = debited;
                    target.balance = credited;
                    Ok(())
                })
            })
            .await
            .map(|(from, to)| Transfer { from, to, amount });

        if result.is_ok() {
            info!(from = %from, to = %to, %amount, "Transfer completed");
        }
        self.observe("transfer", result)
    }

    /// Account storage
    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Lock table
    pub fn locks(&self) -> &Arc<KeyedLock> {
        &self.locks
    }

    /// Operation metrics
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn lock(&self, id: AccountId) -> KeyedLockGuard<'_> {
        let started = Instant::now();
        let guard = self.locks.acquire(id).await;
        self.metrics.lock_wait.observe(started.elapsed().as_secs_f64());
        guard
    }

    async fn lock_pair(
        &self,
        a: AccountId,
        b: AccountId,
    ) -> Result<(KeyedLockGuard<'_>, KeyedLockGuard<'_>)> {
        let started = Instant::now();
        let guards = self.locks.acquire_pair(a, b).await?;
        self.metrics.lock_wait.observe(started.elapsed().as_secs_f64());
        Ok(guards)
    }

    fn check_amount(&self, amount: Decimal) -> Result<()> {
        match self.config.amount_policy {
            AmountPolicy::Positive if amount <= Decimal::ZERO => Err(Error::InvalidArgument(
                "Amount must be positive".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeouts.read_timeout_ms)
    }

    fn observe<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.metrics.record(operation, "ok"),
            Err(e) => {
                self.metrics.record(operation, e.root().kind().as_str());
                warn!(operation, error = %e, "Operation failed");
            }
        }
        result
    }
}

/// Balance arithmetic result, `None` meaning the value left `Decimal`'s range
fn checked(value: Option<Decimal>) -> Result<Decimal> {
    value.ok_or_else(|| Error::InvalidArgument("Amount out of range".to_string()))
}
