//! Dashboard state management.
//!
//! DashboardState aggregates the controller, ledger and monitoring service
//! for the handlers and the broadcaster.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use misty_core::Transaction;
use misty_lifecycle::{BotController, RunState};
use misty_telemetry::{LogEntry, MonitoringService};

use crate::types::StatusSnapshot;

#[derive(Clone)]
pub struct DashboardState {
    controller: Arc<BotController>,
    /// Monitoring service (None when the bot runs without one).
    monitor: Option<Arc<MonitoringService>>,
}

impl DashboardState {
    pub fn new(controller: Arc<BotController>) -> Self {
        Self {
            controller,
            monitor: None,
        }
    }

    pub fn with_monitor(mut self, monitor: Arc<MonitoringService>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn controller(&self) -> &Arc<BotController> {
        &self.controller
    }

    pub fn collect_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            timestamp_ms: Utc::now().timestamp_millis(),
            bot: self.controller.status(),
            monitor: self.monitor.as_ref().map(|m| m.stats()),
        }
    }

    pub fn history(&self) -> Vec<Transaction> {
        self.controller.history()
    }

    pub fn recent_logs(&self) -> Vec<LogEntry> {
        self.monitor
            .as_ref()
            .map(|m| m.recent_logs())
            .unwrap_or_default()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.controller.subscribe()
    }
}
