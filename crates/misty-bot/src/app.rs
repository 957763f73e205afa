//! Main application orchestration.
//!
//! Builds the collaborators from [`AppConfig`], owns the controller and runs
//! the dashboard until a shutdown signal arrives. The bot is always stopped
//! before the process exits.

use std::sync::Arc;

use tracing::{info, warn};

use misty_core::Collaborator;
use misty_dashboard::{run_server, DashboardState};
use misty_lifecycle::{BotController, RunState};
use misty_telemetry::{LogBuffer, MonitoringService};
use misty_wallet::Ledger;

use crate::config::AppConfig;
use crate::engine::StandbyEngine;
use crate::error::AppResult;

pub struct Application {
    config: AppConfig,
    controller: Arc<BotController>,
    monitor: Arc<MonitoringService>,
}

impl Application {
    /// Wire up the ledger, monitor, engine and controller.
    ///
    /// `logs` is the buffer returned by `init_logging`; pass `None` when
    /// logging was set up elsewhere.
    pub fn new(config: AppConfig, logs: Option<LogBuffer>) -> Self {
        let ledger = Arc::new(Ledger::new(config.wallet.clone()));

        let mut monitor = MonitoringService::new(config.monitor.clone());
        if let Some(logs) = logs {
            monitor = monitor.with_log_buffer(logs);
        }
        let monitor = Arc::new(monitor);

        let engine: Arc<dyn Collaborator> =
            Arc::new(StandbyEngine::new(config.engine.clone(), Arc::clone(&ledger)));

        let controller = Arc::new(BotController::new(
            config.bot.clone(),
            ledger,
            monitor.clone(),
            engine,
            config.lifecycle.clone(),
        ));

        Self {
            config,
            controller,
            monitor,
        }
    }

    pub fn controller(&self) -> &Arc<BotController> {
        &self.controller
    }

    pub fn dashboard_state(&self) -> DashboardState {
        DashboardState::new(Arc::clone(&self.controller)).with_monitor(Arc::clone(&self.monitor))
    }

    /// Serve the dashboard until Ctrl-C, then stop the bot.
    pub async fn serve(&self) -> AppResult<()> {
        let missing = self.config.bot.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "Required settings incomplete; start will be refused");
        }

        if self.config.dashboard.enabled {
            info!(port = self.config.dashboard.port, "Dashboard available");
            run_server(
                self.dashboard_state(),
                self.config.dashboard.clone(),
                shutdown_signal(),
            )
            .await?;
        } else {
            info!("Dashboard disabled, waiting for shutdown signal");
            shutdown_signal().await;
        }

        self.shutdown().await
    }

    /// Start the bot, then serve until Ctrl-C.
    pub async fn run(&self) -> AppResult<()> {
        self.controller.start().await?;
        self.serve().await
    }

    /// Stop the bot if this process has it running.
    ///
    /// Returns the state observed before stopping.
    pub async fn stop(&self) -> AppResult<RunState> {
        let before = self.controller.state();
        self.controller.stop().await?;
        Ok(before)
    }

    async fn shutdown(&self) -> AppResult<()> {
        info!("Shutting down");
        self.controller.stop().await?;
        let status = self.controller.status();
        info!(
            balance = %status.balance,
            transactions = status.transaction_count,
            "Final ledger state"
        );
        Ok(())
    }
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
    }
}
