//! Wallet storage boundary.
//!
//! Defines the repository and transaction contracts the wallet service is
//! written against, plus the in-memory backend used by the demo and tests.

pub mod error;
pub mod in_memory;
pub mod transaction;

#[cfg(test)]
pub(crate) mod testing;

pub use error::RepositoryError;
pub use in_memory::{InMemoryTransaction, InMemoryWalletRepository};
pub use transaction::{TransactionState, WalletTransaction};

use std::sync::Arc;

use tallybook_core::WalletId;
use tallybook_wallets::Wallet;

/// Keyed storage of wallets.
///
/// ## Copy semantics
///
/// Every method takes and returns owned `Wallet` values. Implementations must
/// never hand out references into their internal state, so a caller mutating
/// a returned wallet cannot change what is stored.
///
/// ## Concurrency
///
/// All methods may be called concurrently. Readers never observe a partially
/// written record, and concurrent writes to the same wallet must not lose an
/// update (serialize them, or reject the loser with `Conflict`).
///
/// ## Errors
///
/// - `get_by_id` / `update` on a missing id → `DomainError::WalletNotFound`
/// - `create` on an existing id → `DomainError::DuplicateWallet`
/// - `begin_transaction` → `RepositoryError::Transaction` if no unit of work can be started
pub trait WalletRepository: Send + Sync {
    fn get_by_id(&self, id: &WalletId) -> Result<Wallet, RepositoryError>;

    fn create(&self, wallet: Wallet) -> Result<(), RepositoryError>;

    /// Replace the stored record for `wallet.id()`. Not an upsert.
    fn update(&self, wallet: &Wallet) -> Result<(), RepositoryError>;

    fn begin_transaction(&self) -> Result<Box<dyn WalletTransaction + '_>, RepositoryError>;
}

impl<R> WalletRepository for Arc<R>
where
    R: WalletRepository + ?Sized,
{
    fn get_by_id(&self, id: &WalletId) -> Result<Wallet, RepositoryError> {
        (**self).get_by_id(id)
    }

    fn create(&self, wallet: Wallet) -> Result<(), RepositoryError> {
        (**self).create(wallet)
    }

    fn update(&self, wallet: &Wallet) -> Result<(), RepositoryError> {
        (**self).update(wallet)
    }

    fn begin_transaction(&self) -> Result<Box<dyn WalletTransaction + '_>, RepositoryError> {
        (**self).begin_transaction()
    }
}
