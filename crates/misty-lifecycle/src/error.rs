//! Lifecycle error types.

use misty_core::CollaboratorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Bot is already running")]
    AlreadyRunning,

    #[error("Bot is already starting or stopping")]
    AlreadyTransitioning,

    #[error("Missing required configuration: {}", missing.join(", "))]
    ConfigurationInvalid { missing: Vec<String> },

    #[error("{name} failed to start: {source}")]
    Collaborator {
        name: &'static str,
        source: CollaboratorError,
    },
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
