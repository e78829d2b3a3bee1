//! Per-account mutual exclusion
//!
//! [`KeyedLock`] hands out exclusive access to a single [`AccountId`]. Each
//! id maps to its own `tokio::sync::Mutex`, so waiters are parked by the
//! runtime instead of polling, and operations on different ids never block
//! each other.
//!
//! # Lock table lifecycle
//!
//! ```text
//!   acquire(id) ──► entry(id) created if absent ──► await mutex ──► guard
//!                                                                    │
//!   drop(guard) ◄────────────────────────────────────────────────────┘
//!        │
//!        └──► unlock, then remove entry(id) if nobody else references it
//! ```
//!
//! Absence of an entry means "free". An entry can briefly outlive its last
//! holder when a waiter is cancelled; such an entry is unlocked and is swept
//! by the next release of that id.
//!
//! # Deadlock avoidance
//!
//! Operations needing two ids call [`KeyedLock::acquire_pair`], which always
//! locks the lower id first. Two transfers with swapped endpoints therefore
//! contend on the same first lock and can never each hold one lock while
//! waiting on the other. The rule is only claimed for two participants.

use crate::{types::AccountId, Error, Result};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Table of per-account locks
#[derive(Default)]
pub struct KeyedLock {
    table: DashMap<AccountId, Arc<Mutex<()>>>,
}

/// Exclusive hold on one account id, released on drop
pub struct KeyedLockGuard<'a> {
    table: &'a DashMap<AccountId, Arc<Mutex<()>>>,
    id: AccountId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLock {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
        }
    }

    /// Wait until no other operation holds `id`, then hold it
    pub async fn acquire(&self, id: AccountId) -> KeyedLockGuard<'_> {
        // The shard lock taken by `entry` is released at the end of this
        // statement, before any await.
        let mutex = self
            .table
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        let guard = mutex.lock_owned().await;
        debug!(account = %id, "Lock acquired");

        KeyedLockGuard {
            table: &self.table,
            id,
            guard: Some(guard),
        }
    }

    /// Hold two distinct ids, lower id first; guards are returned in
    /// argument order
    pub async fn acquire_pair(
        &self,
        a: AccountId,
        b: AccountId,
    ) -> Result<(KeyedLockGuard<'_>, KeyedLockGuard<'_>)> {
        if a == b {
            return Err(Error::InvalidArgument(
                "Cannot transfer to the same account".to_string(),
            ));
        }

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let low_guard = self.acquire(low).await;
        let high_guard = self.acquire(high).await;

        if a < b {
            Ok((low_guard, high_guard))
        } else {
            Ok((high_guard, low_guard))
        }
    }

    /// Whether some operation currently holds `id`
    pub fn is_locked(&self, id: AccountId) -> bool {
        self.table
            .get(&id)
            .map(|mutex| mutex.try_lock().is_err())
            .unwrap_or(false)
    }

    /// Number of live lock table entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the lock table has no entries
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl KeyedLockGuard<'_> {
    /// Id held by this guard
    pub fn id(&self) -> AccountId {
        self.id
    }
}

impl Drop for KeyedLockGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our own Arc no longer counts as a reference.
        drop(self.guard.take());
        self.table
            .remove_if(&self.id, |_, mutex| Arc::strong_count(mutex) == 1);
        debug!(account = %self.id, "Lock released");
    }
}
