use thiserror::Error;

use tallybook_core::{DomainError, ErrorKind};

use super::transaction::TransactionState;

/// Wallet repository / transaction operation error.
///
/// Domain failures (missing or duplicate wallets) pass through unchanged in
/// `Domain`; the remaining variants are storage failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The backend could not begin, commit or roll back a unit of work.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// The transaction was already finalized.
    #[error("transaction is already {0}")]
    TransactionClosed(TransactionState),

    /// Optimistic concurrency check failed at commit.
    #[error("concurrent modification: {0}")]
    Conflict(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::Domain(e) => e.kind(),
            RepositoryError::Transaction(_) => ErrorKind::Transaction,
            RepositoryError::TransactionClosed(_) => ErrorKind::TransactionClosed,
            RepositoryError::Conflict(_) => ErrorKind::Conflict,
            RepositoryError::Backend(_) => ErrorKind::Backend,
        }
    }

    pub(crate) fn poisoned() -> Self {
        RepositoryError::Backend("lock poisoned".to_string())
    }
}
