//! Prometheus metrics, structured logging and monitoring for Misty.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - In-memory capture of recent log lines for the dashboard
//! - Prometheus metrics for the wallet and bot lifecycle
//! - `MonitoringService`, the monitoring collaborator started with the bot

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod monitor;

pub use config::{MonitorConfig, TelemetryConfig};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogBuffer, LogEntry, RecentLogsLayer};
pub use metrics::Metrics;
pub use monitor::{MonitorStats, MonitoringService};
