//! Test doubles for exercising service error paths.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tallybook_core::{DomainError, Entity, WalletId};
use tallybook_wallets::Wallet;

use super::{RepositoryError, TransactionState, WalletRepository, WalletTransaction};

/// Repository whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingWalletRepository;

impl WalletRepository for FailingWalletRepository {
    fn get_by_id(&self, _id: &WalletId) -> Result<Wallet, RepositoryError> {
        Err(RepositoryError::Backend("failing repository: get operation failed".to_string()))
    }

    fn create(&self, _wallet: Wallet) -> Result<(), RepositoryError> {
        Err(RepositoryError::Backend("failing repository: create operation failed".to_string()))
    }

    fn update(&self, _wallet: &Wallet) -> Result<(), RepositoryError> {
        Err(RepositoryError::Backend("failing repository: update operation failed".to_string()))
    }

    fn begin_transaction(&self) -> Result<Box<dyn WalletTransaction + '_>, RepositoryError> {
        Err(RepositoryError::Transaction("failing repository: transaction failed".to_string()))
    }
}

#[derive(Debug, Default)]
struct Faults {
    get: Option<RepositoryError>,
    update_of: Option<(WalletId, RepositoryError)>,
    create: Option<RepositoryError>,
    begin: Option<RepositoryError>,
    /// Error plus the number of commits it still applies to.
    commit: Option<(usize, RepositoryError)>,
    rollback: Option<RepositoryError>,
}

/// Buffered in-memory repository with injectable faults and call counters.
#[derive(Debug, Default)]
pub struct ScriptedWalletRepository {
    wallets: Mutex<HashMap<WalletId, Wallet>>,
    faults: Mutex<Faults>,
    begins: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl ScriptedWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wallet(self, wallet: Wallet) -> Self {
        self.wallets
            .lock()
            .unwrap()
            .insert(wallet.id().clone(), wallet);
        self
    }

    pub fn failing_get(self, err: RepositoryError) -> Self {
        self.faults.lock().unwrap().get = Some(err);
        self
    }

    pub fn failing_update_of(self, id: &WalletId, err: RepositoryError) -> Self {
        self.faults.lock().unwrap().update_of = Some((id.clone(), err));
        self
    }

    pub fn failing_create(self, err: RepositoryError) -> Self {
        self.faults.lock().unwrap().create = Some(err);
        self
    }

    pub fn failing_begin(self, err: RepositoryError) -> Self {
        self.faults.lock().unwrap().begin = Some(err);
        self
    }

    /// Fail the next `times` commits with `err`.
    pub fn failing_commit(self, times: usize, err: RepositoryError) -> Self {
        self.faults.lock().unwrap().commit = Some((times, err));
        self
    }

    pub fn failing_rollback(self, err: RepositoryError) -> Self {
        self.faults.lock().unwrap().rollback = Some(err);
        self
    }

    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    fn check_update(&self, wallet: &Wallet) -> Result<(), RepositoryError> {
        match &self.faults.lock().unwrap().update_of {
            Some((id, err)) if id == wallet.id() => Err(err.clone()),
            _ => Ok(()),
        }
    }

    fn take_commit_fault(&self) -> Option<RepositoryError> {
        let mut faults = self.faults.lock().unwrap();
        let (remaining, err) = faults.commit.as_mut()?;
        let err = err.clone();
        *remaining -= 1;
        if *remaining == 0 {
            faults.commit = None;
        }
        Some(err)
    }
}

impl WalletRepository for ScriptedWalletRepository {
    fn get_by_id(&self, id: &WalletId) -> Result<Wallet, RepositoryError> {
        if let Some(err) = &self.faults.lock().unwrap().get {
            return Err(err.clone());
        }
        self.wallets
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::wallet_not_found(id).into())
    }

    fn create(&self, wallet: Wallet) -> Result<(), RepositoryError> {
        if let Some(err) = &self.faults.lock().unwrap().create {
            return Err(err.clone());
        }
        let mut wallets = self.wallets.lock().unwrap();
        if wallets.contains_key(wallet.id()) {
            return Err(DomainError::duplicate_wallet(wallet.id()).into());
        }
        wallets.insert(wallet.id().clone(), wallet);
        Ok(())
    }

    fn update(&self, wallet: &Wallet) -> Result<(), RepositoryError> {
        self.check_update(wallet)?;
        let mut wallets = self.wallets.lock().unwrap();
        let stored = wallets
            .get_mut(wallet.id())
            .ok_or_else(|| DomainError::wallet_not_found(wallet.id()))?;
        *stored = wallet.clone();
        Ok(())
    }

    fn begin_transaction(&self) -> Result<Box<dyn WalletTransaction + '_>, RepositoryError> {
        if let Some(err) = &self.faults.lock().unwrap().begin {
            return Err(err.clone());
        }
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedTransaction {
            repo: self,
            state: TransactionState::Open,
            staged: HashMap::new(),
        }))
    }
}

struct ScriptedTransaction<'a> {
    repo: &'a ScriptedWalletRepository,
    state: TransactionState,
    staged: HashMap<WalletId, Wallet>,
}

impl WalletTransaction for ScriptedTransaction<'_> {
    fn get_by_id(&mut self, id: &WalletId) -> Result<Wallet, RepositoryError> {
        self.state.ensure_open()?;
        match self.staged.get(id) {
            Some(wallet) => Ok(wallet.clone()),
            None => self.repo.get_by_id(id),
        }
    }

    fn update(&mut self, wallet: &Wallet) -> Result<(), RepositoryError> {
        self.state.ensure_open()?;
        self.repo.check_update(wallet)?;
        if !self.staged.contains_key(wallet.id()) {
            self.repo.get_by_id(wallet.id())?;
        }
        self.staged.insert(wallet.id().clone(), wallet.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), RepositoryError> {
        self.state.ensure_open()?;
        if let Some(err) = self.repo.take_commit_fault() {
            self.staged.clear();
            self.state = TransactionState::RolledBack;
            return Err(err);
        }

        let mut wallets = self.repo.wallets.lock().unwrap();
        for (id, wallet) in self.staged.drain() {
            wallets.insert(id, wallet);
        }
        self.state = TransactionState::Committed;
        self.repo.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), RepositoryError> {
        self.repo.rollbacks.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.repo.faults.lock().unwrap().rollback {
            return Err(err.clone());
        }
        if self.state.is_open() {
            self.staged.clear();
            self.state = TransactionState::RolledBack;
        }
        Ok(())
    }

    fn state(&self) -> TransactionState {
        self.state
    }
}
