//! Ledger transaction records.
//!
//! A `Transaction` is created once by the ledger and never mutated
//! afterwards; fields are only reachable through accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::Amount;

/// Kind of balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    /// Label used for logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique transaction identifier.
///
/// Format: `txn_{sequence}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Build an identifier from a generator sequence value.
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("txn_{seq}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable record of one balance-changing event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    kind: TransactionKind,
    amount: Amount,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        kind: TransactionKind,
        amount: Amount,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            amount,
            timestamp,
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Signed effect of this transaction on the balance.
    pub fn signed_amount(&self) -> rust_decimal::Decimal {
        match self.kind {
            TransactionKind::Deposit => self.amount.inner(),
            TransactionKind::Withdrawal => -self.amount.inner(),
        }
    }
}
