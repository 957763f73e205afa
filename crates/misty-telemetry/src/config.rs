//! Telemetry and monitoring configuration.

use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Force JSON output (also enabled by `RUST_ENV=production`).
    #[serde(default)]
    pub json: bool,
    /// Number of recent log lines kept for the dashboard.
    #[serde(default = "default_log_buffer_capacity")]
    pub log_buffer_capacity: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_buffer_capacity() -> usize {
    200
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
            log_buffer_capacity: default_log_buffer_capacity(),
        }
    }
}

/// Monitoring service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Interval between periodic stats reports (seconds). 0 disables the reporter.
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
}

fn default_report_interval_secs() -> u64 {
    60
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: default_report_interval_secs(),
        }
    }
}
