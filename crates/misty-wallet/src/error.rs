//! Wallet error types.

use misty_core::Amount;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Invalid amount: {amount} (must be greater than zero)")]
    InvalidAmount { amount: Decimal },

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Amount, available: Amount },

    #[error("Balance overflow: depositing {requested} onto {available} exceeds the representable range")]
    BalanceOverflow { requested: Amount, available: Amount },
}

impl WalletError {
    /// Metric label for the rejection reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::BalanceOverflow { .. } => "balance_overflow",
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
