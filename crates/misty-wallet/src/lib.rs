//! In-memory account ledger.
//!
//! Owns a single account's balance and its append-only transaction log.
//! Balance checks, balance updates and log appends happen under one lock,
//! so concurrent withdrawals can never overdraw the account.

pub mod config;
pub mod error;
pub mod id;
pub mod ledger;

pub use config::WalletConfig;
pub use error::{WalletError, WalletResult};
pub use id::{Clock, SystemClock, TransactionIdGenerator};
pub use ledger::Ledger;
