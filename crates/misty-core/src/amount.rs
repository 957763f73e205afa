//! Precision-safe currency amounts.
//!
//! Uses `rust_decimal` for exact decimal arithmetic, avoiding
//! floating-point rounding errors in balance bookkeeping.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Currency quantity with exact decimal precision.
///
/// Used both for balances (non-negative) and transaction amounts
/// (strictly positive, see [`Amount::positive`]).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Build a transaction amount, rejecting zero and negative values.
    pub fn positive(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidAmount(format!(
                "{value} (must be greater than zero)"
            )))
        }
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Add, returning `None` if the result exceeds the decimal range.
    #[inline]
    pub fn checked_add(&self, rhs: Amount) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Subtract, returning `None` if the result would be negative.
    #[inline]
    pub fn checked_sub(&self, rhs: Amount) -> Option<Self> {
        if rhs.0 > self.0 {
            None
        } else {
            Some(Self(self.0 - rhs.0))
        }
    }

    /// Lossy conversion for metrics gauges.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_rejects_zero_and_negative() {
        assert!(Amount::positive(dec!(0)).is_err());
        assert!(Amount::positive(dec!(-5)).is_err());
        assert_eq!(Amount::positive(dec!(0.01)).unwrap().inner(), dec!(0.01));
    }

    #[test]
    fn test_checked_sub() {
        let balance = Amount::new(dec!(70));
        assert_eq!(
            balance.checked_sub(Amount::new(dec!(30))),
            Some(Amount::new(dec!(40)))
        );
        assert_eq!(balance.checked_sub(Amount::new(dec!(70))), Some(Amount::ZERO));
        assert_eq!(balance.checked_sub(Amount::new(dec!(70.0001))), None);
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Amount::new(Decimal::MAX);
        assert_eq!(max.checked_add(Amount::new(dec!(1))), None);
        assert_eq!(
            Amount::new(dec!(0.1)).checked_add(Amount::new(dec!(0.2))),
            Some(Amount::new(dec!(0.3)))
        );
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Amount::new(dec!(70.5)).to_f64(), 70.5);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Amount::new(dec!(100.25))).unwrap();
        assert_eq!(json, "\"100.25\"");
    }
}
