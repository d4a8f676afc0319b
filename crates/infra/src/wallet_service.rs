//! Wallet application service (transfer orchestration).
//!
//! ## Transfer flow
//!
//! ```text
//! transfer(from, to, amount)
//!   ↓
//! 1. Validate input (distinct wallets, positive amount) — no IO yet
//!   ↓
//! 2. Begin transaction
//!   ↓
//! 3. Load source, then destination, through the transaction
//!   ↓
//! 4. Check funds, compute both new balances
//!   ↓
//! 5. Write source, then destination, through the transaction
//!   ↓
//! 6. Commit (or roll back on any failure in 3–6)
//! ```
//!
//! A transfer either moves the full amount or changes nothing. When the commit
//! loses an optimistic concurrency race, steps 2–6 are re-run from fresh reads,
//! up to `TransferConfig::max_conflict_retries` times.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tallybook_core::{DomainError, Entity, ErrorKind, Money, WalletId};
use tallybook_wallets::Wallet;

use crate::config::TransferConfig;
use crate::repository::{RepositoryError, WalletRepository, WalletTransaction};

/// The step of a transfer that failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TransferStep {
    BeginTransaction,
    LoadSource,
    LoadDestination,
    ComputeBalances,
    UpdateSource,
    UpdateDestination,
    Commit,
}

impl core::fmt::Display for TransferStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            TransferStep::BeginTransaction => "begin transaction",
            TransferStep::LoadSource => "load source wallet",
            TransferStep::LoadDestination => "load destination wallet",
            TransferStep::ComputeBalances => "compute new balances",
            TransferStep::UpdateSource => "update source wallet",
            TransferStep::UpdateDestination => "update destination wallet",
            TransferStep::Commit => "commit transaction",
        })
    }
}

/// Wallet service error.
///
/// Use `kind()` to branch on the failure; the `Display` text and `source()`
/// chain say where it happened.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was refused on its own merits (same wallet, bad amount,
    /// insufficient funds).
    #[error(transparent)]
    Rejected(DomainError),

    /// A collaborator failed during the given transfer step.
    #[error("failed to {step}")]
    Step {
        step: TransferStep,
        #[source]
        source: RepositoryError,
    },

    /// A plain repository call (create/get) failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    fn at(step: TransferStep) -> impl FnOnce(RepositoryError) -> ServiceError {
        move |source| ServiceError::Step { step, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Rejected(e) => e.kind(),
            ServiceError::Step { source, .. } | ServiceError::Repository(source) => source.kind(),
        }
    }

    /// The transfer step that failed, if the error came from one.
    pub fn step(&self) -> Option<TransferStep> {
        match self {
            ServiceError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Snapshot of both wallets right after a committed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub from: Wallet,
    pub to: Wallet,
    pub amount: Money,
    pub completed_at: DateTime<Utc>,
}

/// Wallet operations over any `WalletRepository`.
///
/// The service holds no state of its own beyond the repository handle and its
/// configuration; share it freely between threads when `R` allows.
#[derive(Debug)]
pub struct WalletService<R> {
    repo: R,
    config: TransferConfig,
}

impl<R> WalletService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, TransferConfig::default())
    }

    pub fn with_config(repo: R, config: TransferConfig) -> Self {
        Self { repo, config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> TransferConfig {
        self.config
    }
}

impl<R> WalletService<R>
where
    R: WalletRepository,
{
    pub fn create_wallet(
        &self,
        id: WalletId,
        owner: impl Into<String>,
        initial_balance: Money,
    ) -> Result<Wallet, ServiceError> {
        let wallet = Wallet::new(id, owner, initial_balance);
        self.repo.create(wallet.clone())?;

        tracing::info!(
            "created wallet {} for {} with balance {}",
            wallet.id(),
            wallet.owner(),
            wallet.balance()
        );
        Ok(wallet)
    }

    pub fn get_wallet(&self, id: &WalletId) -> Result<Wallet, ServiceError> {
        Ok(self.repo.get_by_id(id)?)
    }

    /// Move `amount` from `from` to `to` atomically.
    ///
    /// ## Errors
    ///
    /// - `SameWallet` / `InvalidAmount`: rejected before any IO
    /// - `WalletNotFound`: either wallet is missing
    /// - `InsufficientFunds`: source balance below `amount`
    /// - `Transaction` / `Conflict` / `Backend`: storage failure at the reported step
    ///
    /// On every error both wallets are left exactly as they were.
    pub fn transfer(
        &self,
        from: &WalletId,
        to: &WalletId,
        amount: Money,
    ) -> Result<TransferReceipt, ServiceError> {
        if from == to {
            return Err(ServiceError::Rejected(DomainError::SameWallet(from.clone())));
        }
        if !amount.is_positive() {
            return Err(ServiceError::Rejected(DomainError::invalid_amount(
                "transfer amount must be positive",
            )));
        }

        let mut attempt = 0;
        loop {
            match self.transfer_once(from, to, amount) {
                Err(err)
                    if err.kind() == ErrorKind::Conflict
                        && attempt < self.config.max_conflict_retries =>
                {
                    attempt += 1;
                    tracing::warn!(
                        "transfer {} -> {} hit a write conflict, retrying ({}/{})",
                        from,
                        to,
                        attempt,
                        self.config.max_conflict_retries
                    );
                }
                result => return result,
            }
        }
    }

    fn transfer_once(
        &self,
        from: &WalletId,
        to: &WalletId,
        amount: Money,
    ) -> Result<TransferReceipt, ServiceError> {
        let mut tx = self
            .repo
            .begin_transaction()
            .map_err(ServiceError::at(TransferStep::BeginTransaction))?;

        let outcome = Self::run(tx.as_mut(), from, to, amount);

        match &outcome {
            Ok(receipt) => tracing::info!(
                "transferred {} from {} to {} (balances now {} / {})",
                amount,
                from,
                to,
                receipt.from.balance(),
                receipt.to.balance()
            ),
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!("rollback after failed transfer also failed: {rollback_err}");
                }
                tracing::debug!("transfer {} -> {} rolled back: {}", from, to, err);
            }
        }

        outcome
    }

    fn run(
        tx: &mut dyn WalletTransaction,
        from: &WalletId,
        to: &WalletId,
        amount: Money,
    ) -> Result<TransferReceipt, ServiceError> {
        let source = tx
            .get_by_id(from)
            .map_err(ServiceError::at(TransferStep::LoadSource))?;
        let destination = tx
            .get_by_id(to)
            .map_err(ServiceError::at(TransferStep::LoadDestination))?;

        if !source.balance().greater_or_equal(amount) {
            return Err(ServiceError::Rejected(DomainError::insufficient_funds(
                source.balance(),
                amount,
            )));
        }

        let debited = source
            .debited(amount)
            .map_err(|e| ServiceError::at(TransferStep::ComputeBalances)(e.into()))?;
        let credited = destination
            .credited(amount)
            .map_err(|e| ServiceError::at(TransferStep::ComputeBalances)(e.into()))?;

        tx.update(&debited)
            .map_err(ServiceError::at(TransferStep::UpdateSource))?;
        tx.update(&credited)
            .map_err(ServiceError::at(TransferStep::UpdateDestination))?;
        tx.commit().map_err(ServiceError::at(TransferStep::Commit))?;

        Ok(TransferReceipt {
            from: debited,
            to: credited,
            amount,
            completed_at: Utc::now(),
        })
    }
}
