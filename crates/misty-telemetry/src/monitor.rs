//! Monitoring service.
//!
//! Tracks monitoring sessions (one per bot run), periodically reports a
//! summary to the log, and exposes stats and recent log lines to the
//! dashboard.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use misty_core::{Collaborator, CollaboratorError};

use crate::config::MonitorConfig;
use crate::logging::{LogBuffer, LogEntry};
use crate::metrics::Metrics;

/// Point-in-time monitoring statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorStats {
    /// A monitoring session is in progress.
    pub active: bool,
    /// Sessions started since process start.
    pub sessions: u64,
    /// Start of the current session.
    pub started_at: Option<DateTime<Utc>>,
    /// Seconds since the current session started.
    pub uptime_secs: Option<i64>,
    /// Deposits recorded since process start.
    pub deposits: u64,
    /// Withdrawals recorded since process start.
    pub withdrawals: u64,
}

struct Reporter {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct MonitorState {
    started_at: Option<DateTime<Utc>>,
    sessions: u64,
    reporter: Option<Reporter>,
}

/// Monitoring collaborator.
pub struct MonitoringService {
    config: MonitorConfig,
    logs: Option<LogBuffer>,
    state: Mutex<MonitorState>,
}

impl MonitoringService {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            logs: None,
            state: Mutex::new(MonitorState::default()),
        }
    }

    /// Attach the buffer filled by the recent-logs layer.
    pub fn with_log_buffer(mut self, logs: LogBuffer) -> Self {
        self.logs = Some(logs);
        self
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().started_at.is_some()
    }

    pub fn stats(&self) -> MonitorStats {
        let state = self.state.lock();
        let uptime_secs = state
            .started_at
            .map(|started| (Utc::now() - started).num_seconds());
        MonitorStats {
            active: state.started_at.is_some(),
            sessions: state.sessions,
            started_at: state.started_at,
            uptime_secs,
            deposits: Metrics::transaction_count("deposit"),
            withdrawals: Metrics::transaction_count("withdrawal"),
        }
    }

    /// Recent log lines, oldest first. Empty when no buffer is attached.
    pub fn recent_logs(&self) -> Vec<LogEntry> {
        self.logs
            .as_ref()
            .map(LogBuffer::snapshot)
            .unwrap_or_default()
    }

    fn spawn_reporter(&self, started_at: DateTime<Utc>) -> Option<Reporter> {
        if self.config.report_interval_secs == 0 {
            return None;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let period = Duration::from_secs(self.config.report_interval_secs);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        info!(
                            uptime_secs = (Utc::now() - started_at).num_seconds(),
                            deposits = Metrics::transaction_count("deposit"),
                            withdrawals = Metrics::transaction_count("withdrawal"),
                            "Monitoring report"
                        );
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("Monitoring reporter exited");
        });

        Some(Reporter { shutdown, handle })
    }
}

#[async_trait]
impl Collaborator for MonitoringService {
    fn name(&self) -> &'static str {
        "monitor"
    }

    async fn start(&self) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock();
        if state.started_at.is_some() {
            return Err(CollaboratorError::new("monitoring already active"));
        }

        let started_at = Utc::now();
        state.started_at = Some(started_at);
        state.sessions += 1;
        state.reporter = self.spawn_reporter(started_at);
        Metrics::monitor_session();

        info!(
            session = state.sessions,
            report_interval_secs = self.config.report_interval_secs,
            "Monitoring started"
        );
        Ok(())
    }

    async fn stop(&self) -> Result<(), CollaboratorError> {
        let (started_at, reporter) = {
            let mut state = self.state.lock();
            let started_at = state
                .started_at
                .take()
                .ok_or_else(|| CollaboratorError::new("monitoring not active"))?;
            (started_at, state.reporter.take())
        };

        if let Some(reporter) = reporter {
            let _ = reporter.shutdown.send(true);
            if let Err(e) = reporter.handle.await {
                warn!(error = %e, "Monitoring reporter did not shut down cleanly");
            }
        }

        info!(
            uptime_secs = (Utc::now() - started_at).num_seconds(),
            "Monitoring stopped"
        );
        Ok(())
    }
}
