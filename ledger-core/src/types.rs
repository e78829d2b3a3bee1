//! Core types for the ledger
//!
//! All types are designed for:
//! - Cheap copies (snapshots never alias the stored record)
//! - Exact arithmetic (Decimal for money)
//! - A total order on identifiers, used as the global lock order

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier, assigned by the store starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(u64);

impl AccountId {
    /// Create new account ID
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw numeric value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monetary account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Identifier, unique and never reused
    pub id: AccountId,

    /// Current balance, never negative after a completed operation
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub balance: Decimal,
}

impl Account {
    /// Create a new account record
    pub fn new(id: AccountId, balance: Decimal) -> Self {
        Self { id, balance }
    }
}

/// Receipt of a completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Debited account after the transfer
    pub from: Account,

    /// Credited account after the transfer
    pub to: Account,

    /// Amount moved
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
}
