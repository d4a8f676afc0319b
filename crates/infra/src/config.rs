//! Configuration loading and representation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `TransferConfig::max_conflict_retries`.
pub const MAX_CONFLICT_RETRIES_ENV: &str = "TALLYBOOK_MAX_CONFLICT_RETRIES";

const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Tuning for `WalletService::transfer`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// How many times a transfer is re-run after its commit lost an optimistic
    /// concurrency race. `0` disables retrying.
    pub max_conflict_retries: u32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
        }
    }
}

impl TransferConfig {
    /// Read overrides from the process environment; unset keys keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_CONFLICT_RETRIES_ENV) {
            config.max_conflict_retries =
                raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: MAX_CONFLICT_RETRIES_ENV,
                    value: raw.clone(),
                })?;
        }

        Ok(config)
    }
}
