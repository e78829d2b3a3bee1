//! Error types for the ledger

use crate::types::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Bad input (negative opening balance, self-transfer, rejected amount)
    #[error("{0}")]
    InvalidArgument(String),

    /// Unknown account id
    #[error("{0}")]
    NotFound(String),

    /// Withdrawal or transfer exceeds the available funds
    #[error("Insufficient balance")]
    InsufficientBalance {
        /// Account that would go negative
        account: AccountId,
        /// Amount requested
        requested: Decimal,
        /// Balance at the time of the check
        available: Decimal,
    },

    /// Operation exceeded its deadline
    #[error("Operation {operation} timed out after {after_ms}ms")]
    Timeout {
        /// Operation name
        operation: &'static str,
        /// Deadline that expired
        after_ms: u64,
    },

    /// Retry budget exhausted, wraps the last failure
    #[error("Operation failed after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Last underlying failure
        last: Box<Error>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of [`Error`] values, stable across wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidArgument`]
    InvalidArgument,
    /// See [`Error::NotFound`]
    NotFound,
    /// See [`Error::InsufficientBalance`]
    InsufficientBalance,
    /// See [`Error::Timeout`]
    Timeout,
    /// See [`Error::Exhausted`]
    Exhausted,
    /// Configuration or IO failure
    Internal,
}

impl ErrorKind {
    /// Label used for metrics and API error codes
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InsufficientBalance => "insufficient_balance",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Exhausted => "exhausted",
            ErrorKind::Internal => "internal",
        }
    }
}

impl Error {
    /// `NotFound` for a single account lookup
    pub fn account_not_found() -> Self {
        Error::NotFound("Account not found".to_string())
    }

    /// `NotFound` for a two-account lookup (transfer)
    pub fn accounts_not_found() -> Self {
        Error::NotFound("One or both accounts not found".to_string())
    }

    /// Kind of this error, without unwrapping `Exhausted`
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Exhausted { .. } => ErrorKind::Exhausted,
            Error::Config(_) | Error::Io(_) => ErrorKind::Internal,
        }
    }

    /// Underlying failure, looking through any `Exhausted` wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Exhausted { last, .. } => last.root(),
            other => other,
        }
    }

    /// Whether another attempt could succeed without the caller changing anything
    pub fn is_transient(&self) -> bool {
        matches!(self.root(), Error::Timeout { .. })
    }
}
