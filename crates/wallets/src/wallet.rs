use serde::{Deserialize, Serialize};

use tallybook_core::{DomainResult, Entity, Money, WalletId};

/// A wallet: identity, display name and balance.
///
/// Values are detached snapshots. Changing a balance produces a new `Wallet`
/// that must be written back through a repository to take effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    id: WalletId,
    owner: String,
    balance: Money,
}

impl Wallet {
    pub fn new(id: WalletId, owner: impl Into<String>, balance: Money) -> Self {
        Self {
            id,
            owner: owner.into(),
            balance,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Same wallet with its balance replaced.
    pub fn with_balance(&self, balance: Money) -> Self {
        Self {
            balance,
            ..self.clone()
        }
    }

    /// Same wallet with `amount` removed from the balance.
    ///
    /// Fails with `InsufficientFunds` rather than going negative.
    pub fn debited(&self, amount: Money) -> DomainResult<Self> {
        Ok(self.with_balance(self.balance.checked_sub(amount)?))
    }

    /// Same wallet with `amount` added to the balance.
    pub fn credited(&self, amount: Money) -> DomainResult<Self> {
        Ok(self.with_balance(self.balance.checked_add(amount)?))
    }
}

impl Entity for Wallet {
    type Id = WalletId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
