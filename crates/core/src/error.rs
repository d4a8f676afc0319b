//! Domain error model.

use thiserror::Error;

use crate::id::WalletId;
use crate::money::Money;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Flat classification of every failure the ledger can report.
///
/// Error enums in the upper layers wrap causes and context; `ErrorKind` is what
/// callers match on when they only care about *which* failure happened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidAmount,
    InsufficientFunds,
    WalletNotFound,
    DuplicateWallet,
    SameWallet,
    InvalidWalletId,
    /// The backend could not begin, commit or roll back a unit of work.
    Transaction,
    /// An operation was attempted on a finalized transaction.
    TransactionClosed,
    /// A concurrent writer modified a record read by the transaction.
    Conflict,
    /// Any other storage failure (poisoned lock, connection loss, ...).
    Backend,
}

impl ErrorKind {
    /// Failures caused by the request itself; retrying the same input cannot succeed.
    pub fn is_validation(self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidAmount
                | ErrorKind::InsufficientFunds
                | ErrorKind::WalletNotFound
                | ErrorKind::DuplicateWallet
                | ErrorKind::SameWallet
                | ErrorKind::InvalidWalletId
        )
    }

    /// Failures that may succeed if the same call is repeated.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Conflict | ErrorKind::Transaction | ErrorKind::Backend)
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, missing records). Storage concerns belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Negative, non-positive or unrepresentable money input.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: Money, requested: Money },

    #[error("wallet not found: {0}")]
    WalletNotFound(WalletId),

    #[error("wallet already exists: {0}")]
    DuplicateWallet(WalletId),

    #[error("cannot transfer from wallet {0} to itself")]
    SameWallet(WalletId),

    #[error("invalid wallet id: {0}")]
    InvalidWalletId(String),
}

impl DomainError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn insufficient_funds(available: Money, requested: Money) -> Self {
        Self::InsufficientFunds {
            available,
            requested,
        }
    }

    pub fn wallet_not_found(id: &WalletId) -> Self {
        Self::WalletNotFound(id.clone())
    }

    pub fn duplicate_wallet(id: &WalletId) -> Self {
        Self::DuplicateWallet(id.clone())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            DomainError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            DomainError::WalletNotFound(_) => ErrorKind::WalletNotFound,
            DomainError::DuplicateWallet(_) => ErrorKind::DuplicateWallet,
            DomainError::SameWallet(_) => ErrorKind::SameWallet,
            DomainError::InvalidWalletId(_) => ErrorKind::InvalidWalletId,
        }
    }
}
