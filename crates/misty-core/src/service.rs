//! Collaborator lifecycle hooks.
//!
//! Services sequenced by the bot controller (wallet, monitoring, trading
//! engine) implement [`Collaborator`]. The controller owns the ordering;
//! implementations only start and stop themselves.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a collaborator hook.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CollaboratorError {
    message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for CollaboratorError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for CollaboratorError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A component whose startup and shutdown is driven by the bot controller.
///
/// Calls may be slow; timeouts and cancellation are the caller's concern.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Stable name used in logs, metrics and error reports.
    fn name(&self) -> &'static str;

    /// Bring the component up.
    async fn start(&self) -> Result<(), CollaboratorError>;

    /// Shut the component down.
    async fn stop(&self) -> Result<(), CollaboratorError>;
}
