use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tallybook_core::{DomainError, Entity, WalletId};
use tallybook_wallets::Wallet;

use super::WalletRepository;
use super::error::RepositoryError;
use super::transaction::{TransactionState, WalletTransaction};

#[derive(Debug, Clone)]
struct StoredWallet {
    wallet: Wallet,
    /// Bumped on every write; checked at commit for optimistic concurrency.
    version: u64,
}

/// In-memory wallet store.
///
/// Construct once and share (e.g. behind an `Arc`) with every consumer. Not
/// optimized for performance.
///
/// Transactions buffer their writes and apply them under a single write lock
/// at commit, after checking that no record they read has changed since.
#[derive(Debug, Default)]
pub struct InMemoryWalletRepository {
    wallets: RwLock<HashMap<WalletId, StoredWallet>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.wallets.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<WalletId, StoredWallet>>, RepositoryError> {
        self.wallets.read().map_err(|_| RepositoryError::poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<WalletId, StoredWallet>>, RepositoryError> {
        self.wallets.write().map_err(|_| RepositoryError::poisoned())
    }

    /// Current snapshot and version of a wallet.
    fn load(&self, id: &WalletId) -> Result<(Wallet, u64), RepositoryError> {
        let wallets = self.read()?;
        wallets
            .get(id)
            .map(|stored| (stored.wallet.clone(), stored.version))
            .ok_or_else(|| DomainError::wallet_not_found(id).into())
    }
}

impl WalletRepository for InMemoryWalletRepository {
    fn get_by_id(&self, id: &WalletId) -> Result<Wallet, RepositoryError> {
        self.load(id).map(|(wallet, _)| wallet)
    }

    fn create(&self, wallet: Wallet) -> Result<(), RepositoryError> {
        let mut wallets = self.write()?;
        if wallets.contains_key(wallet.id()) {
            return Err(DomainError::duplicate_wallet(wallet.id()).into());
        }

        wallets.insert(wallet.id().clone(), StoredWallet { wallet, version: 1 });
        Ok(())
    }

    fn update(&self, wallet: &Wallet) -> Result<(), RepositoryError> {
        let mut wallets = self.write()?;
        let stored = wallets
            .get_mut(wallet.id())
            .ok_or_else(|| DomainError::wallet_not_found(wallet.id()))?;

        stored.wallet = wallet.clone();
        stored.version += 1;
        Ok(())
    }

    fn begin_transaction(&self) -> Result<Box<dyn WalletTransaction + '_>, RepositoryError> {
        if self.wallets.is_poisoned() {
            return Err(RepositoryError::Transaction(
                "cannot begin transaction: store lock poisoned".to_string(),
            ));
        }
        Ok(Box::new(InMemoryTransaction::new(self)))
    }
}

/// Buffered transaction over an `InMemoryWalletRepository`.
#[derive(Debug)]
pub struct InMemoryTransaction<'a> {
    repo: &'a InMemoryWalletRepository,
    state: TransactionState,
    /// Version of every record read or written, as first observed.
    observed: HashMap<WalletId, u64>,
    staged: HashMap<WalletId, Wallet>,
}

impl<'a> InMemoryTransaction<'a> {
    pub fn new(repo: &'a InMemoryWalletRepository) -> Self {
        Self {
            repo,
            state: TransactionState::Open,
            observed: HashMap::new(),
            staged: HashMap::new(),
        }
    }

    fn observe(&mut self, id: &WalletId) -> Result<Wallet, RepositoryError> {
        let (wallet, version) = self.repo.load(id)?;
        self.observed.entry(id.clone()).or_insert(version);
        Ok(wallet)
    }

    fn discard(&mut self) {
        self.staged.clear();
        self.observed.clear();
        self.state = TransactionState::RolledBack;
    }

    fn apply(&mut self) -> Result<(), RepositoryError> {
        let mut wallets = self
            .repo
            .wallets
            .write()
            .map_err(|_| RepositoryError::Transaction("commit failed: store lock poisoned".to_string()))?;

        for (id, expected) in &self.observed {
            match wallets.get(id) {
                Some(stored) if stored.version == *expected => {}
                Some(stored) => {
                    return Err(RepositoryError::Conflict(format!(
                        "wallet {id} changed during transaction (expected version {expected}, found {})",
                        stored.version
                    )));
                }
                None => {
                    return Err(RepositoryError::Conflict(format!(
                        "wallet {id} disappeared during transaction"
                    )));
                }
            }
        }

        for (id, wallet) in self.staged.drain() {
            if let Some(stored) = wallets.get_mut(&id) {
                stored.wallet = wallet;
                stored.version += 1;
            }
        }

        Ok(())
    }
}

impl WalletTransaction for InMemoryTransaction<'_> {
    fn get_by_id(&mut self, id: &WalletId) -> Result<Wallet, RepositoryError> {
        self.state.ensure_open()?;

        if let Some(staged) = self.staged.get(id) {
            return Ok(staged.clone());
        }
        self.observe(id)
    }

    fn update(&mut self, wallet: &Wallet) -> Result<(), RepositoryError> {
        self.state.ensure_open()?;

        if !self.staged.contains_key(wallet.id()) {
            // Existence check; also pins the version this write is based on.
            self.observe(wallet.id())?;
        }
        self.staged.insert(wallet.id().clone(), wallet.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), RepositoryError> {
        self.state.ensure_open()?;

        match self.apply() {
            Ok(()) => {
                self.observed.clear();
                self.state = TransactionState::Committed;
                Ok(())
            }
            Err(err) => {
                self.discard();
                Err(err)
            }
        }
    }

    fn rollback(&mut self) -> Result<(), RepositoryError> {
        if self.state.is_open() {
            self.discard();
        }
        Ok(())
    }

    fn state(&self) -> TransactionState {
        self.state
    }
}
