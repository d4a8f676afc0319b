//! Wallet domain module.
//!
//! Plain data plus the pure state transitions a transfer needs (no IO, no
//! storage). Persistence lives in `tallybook-infra`.

pub mod wallet;

pub use wallet::Wallet;
