//! Fixed-point money (integer minor units).
//!
//! All arithmetic is exact and checked: a `Money` value can never be negative
//! and never silently wraps. Floating point appears only at the edges
//! (`from_major_units` for input, `major_units` for display).

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Minor units per major unit (cents per dollar).
pub const MINOR_PER_MAJOR: u64 = 100;

/// Non-negative amount of money, stored as a count of minor units (cents).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Create from a signed minor-unit count; negative amounts are rejected.
    pub fn new(minor_units: i64) -> DomainResult<Self> {
        u64::try_from(minor_units)
            .map(Self)
            .map_err(|_| DomainError::invalid_amount(format!("amount cannot be negative: {minor_units}")))
    }

    /// Create from an amount already known to be non-negative.
    pub const fn from_minor_units(minor_units: u64) -> Self {
        Self(minor_units)
    }

    /// Create from major units (e.g. dollars), truncating toward zero after
    /// scaling to minor units.
    pub fn from_major_units(value: f64) -> DomainResult<Self> {
        if value.is_nan() || value < 0.0 {
            return Err(DomainError::invalid_amount(format!(
                "amount cannot be negative: {value}"
            )));
        }

        let scaled = (value * MINOR_PER_MAJOR as f64).trunc();
        if !scaled.is_finite() || scaled >= u64::MAX as f64 {
            return Err(DomainError::invalid_amount(format!(
                "amount out of range: {value}"
            )));
        }

        Ok(Self(scaled as u64))
    }

    pub fn minor_units(self) -> u64 {
        self.0
    }

    /// Major-unit value for display. Never feed this back into arithmetic.
    pub fn major_units(self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Sum of both amounts; fails on `u64` overflow instead of wrapping.
    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0.checked_add(other.0).map(Money).ok_or_else(|| {
            DomainError::invalid_amount(format!("{self} + {other} overflows"))
        })
    }

    /// Difference of both amounts; fails with `InsufficientFunds` when `other > self`.
    pub fn checked_sub(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or(DomainError::insufficient_funds(self, other))
    }

    pub fn greater_or_equal(self, other: Money) -> bool {
        self.0 >= other.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "${}.{:02}",
            self.0 / MINOR_PER_MAJOR,
            self.0 % MINOR_PER_MAJOR
        )
    }
}
