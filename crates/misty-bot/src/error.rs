//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] misty_lifecycle::LifecycleError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] misty_telemetry::TelemetryError),

    #[error("Dashboard error: {0}")]
    Dashboard(#[from] misty_dashboard::DashboardError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<::config::ConfigError> for AppError {
    fn from(e: ::config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
