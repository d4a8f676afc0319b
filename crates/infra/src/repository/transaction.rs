use serde::{Deserialize, Serialize};

use tallybook_core::WalletId;
use tallybook_wallets::Wallet;

use super::error::RepositoryError;

/// Lifecycle of a transaction: `Open → {Committed | RolledBack}`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    Open,
    Committed,
    RolledBack,
}

impl TransactionState {
    pub fn is_open(self) -> bool {
        matches!(self, TransactionState::Open)
    }

    /// Fail with `TransactionClosed` unless the transaction is still open.
    pub fn ensure_open(self) -> Result<(), RepositoryError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(RepositoryError::TransactionClosed(self))
        }
    }
}

impl core::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            TransactionState::Open => "open",
            TransactionState::Committed => "committed",
            TransactionState::RolledBack => "rolled back",
        })
    }
}

/// A single-use unit of work over a `WalletRepository`.
///
/// ## Contract
///
/// - `get_by_id` reflects writes already made through the same transaction
///   (read-your-writes).
/// - `update` has the repository's semantics (no upsert) but is only visible
///   to other readers after `commit`.
/// - `commit` applies every write or none of them.
/// - `rollback` discards pending writes. It is idempotent and a no-op after
///   `commit`.
/// - Once finalized, `get_by_id`, `update` and `commit` fail with
///   `RepositoryError::TransactionClosed`.
///
/// A transaction belongs to exactly one caller for its whole lifetime; it is
/// never shared between threads. Dropping an open transaction discards its
/// pending writes.
pub trait WalletTransaction {
    fn get_by_id(&mut self, id: &WalletId) -> Result<Wallet, RepositoryError>;

    fn update(&mut self, wallet: &Wallet) -> Result<(), RepositoryError>;

    fn commit(&mut self) -> Result<(), RepositoryError>;

    fn rollback(&mut self) -> Result<(), RepositoryError>;

    fn state(&self) -> TransactionState;
}
