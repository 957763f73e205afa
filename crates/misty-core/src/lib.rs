//! Core domain types for the Misty trading bot.
//!
//! This crate provides fundamental types used throughout the workspace:
//! - `Amount`: Precision-safe currency quantity
//! - `Transaction`, `TransactionId`, `TransactionKind`: Ledger records
//! - `Secret`: Zeroizing holder for credentials
//! - `Collaborator`: Lifecycle hooks for services sequenced by the controller

pub mod amount;
pub mod error;
pub mod secret;
pub mod service;
pub mod transaction;

pub use amount::Amount;
pub use error::{CoreError, Result};
pub use secret::Secret;
pub use service::{Collaborator, CollaboratorError};
pub use transaction::{Transaction, TransactionId, TransactionKind};
