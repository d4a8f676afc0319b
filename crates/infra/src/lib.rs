//! Infrastructure layer: wallet storage, transactions and the wallet service.

pub mod config;
pub mod repository;
pub mod wallet_service;


pub use config::{ConfigError, TransferConfig};
pub use repository::{
    InMemoryWalletRepository, RepositoryError, TransactionState, WalletRepository,
    WalletTransaction,
};
pub use wallet_service::{ServiceError, TransferReceipt, TransferStep, WalletService};
