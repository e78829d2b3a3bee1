//! DelTran Ledger Core
//!
//! In-memory account ledger with per-account locking and bounded retries.
//!
//! # Architecture
//!
//! - **AccountStore**: Owns account records, assigns ids, hands out snapshots
//! - **KeyedLock**: One async mutex per account id, ordered pair acquisition
//! - **RetryExecutor**: Deadlines plus fixed-backoff retries
//! - **Ledger**: Create/get/deposit/withdraw/transfer on top of the three
//!
//! # Invariants
//!
//! - Non-negative balances: a mutation that would go below zero fails untouched
//! - Stable identity: ids start at 1, increase monotonically, are never reused
//! - Money conservation: a transfer debits and credits in one critical section
//! - Deadlock freedom: two-account operations lock in ascending id order

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all
)]

pub mod config;
pub mod error;
pub mod ledger;
pub mod lock;
pub mod metrics;
pub mod retry;
pub mod store;
pub mod types;

// Re-exports
pub use config::{AmountPolicy, Config, RetryConfig, RetryPolicy, TimeoutConfig};
pub use error::{Error, ErrorKind, Result};
pub use ledger::Ledger;
pub use lock::{KeyedLock, KeyedLockGuard};
pub use metrics::Metrics;
pub use retry::RetryExecutor;
pub use store::AccountStore;
pub use types::{Account, AccountId, Transfer};
