//! Error types for misty-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
