//! Standby trading engine.
//!
//! Holds the trading-engine slot in the bot lifecycle. It runs no strategy;
//! while started it logs a heartbeat with the ledger balance.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use misty_core::{Collaborator, CollaboratorError};
use misty_wallet::Ledger;

use crate::config::EngineConfig;

struct Heartbeat {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

pub struct StandbyEngine {
    config: EngineConfig,
    ledger: Arc<Ledger>,
    heartbeat: Mutex<Option<Heartbeat>>,
}

impl StandbyEngine {
    pub fn new(config: EngineConfig, ledger: Arc<Ledger>) -> Self {
        Self {
            config,
            ledger,
            heartbeat: Mutex::new(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.heartbeat.lock().is_some()
    }

    fn spawn_heartbeat(&self, mut shutdown_rx: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
        if self.config.heartbeat_interval_secs == 0 {
            return None;
        }
        let period = Duration::from_secs(self.config.heartbeat_interval_secs);
        let ledger = Arc::clone(&self.ledger);

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        info!(
                            balance = %ledger.balance(),
                            currency = %ledger.currency(),
                            transactions = ledger.transaction_count(),
                            "Trading engine heartbeat"
                        );
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("Trading engine heartbeat exited");
        }))
    }
}

#[async_trait]
impl Collaborator for StandbyEngine {
    fn name(&self) -> &'static str {
        "trading_engine"
    }

    async fn start(&self) -> Result<(), CollaboratorError> {
        let mut heartbeat = self.heartbeat.lock();
        if heartbeat.is_some() {
            return Err(CollaboratorError::new("trading engine already running"));
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        *heartbeat = Some(Heartbeat {
            shutdown,
            handle: self.spawn_heartbeat(shutdown_rx),
        });

        info!(
            heartbeat_interval_secs = self.config.heartbeat_interval_secs,
            "Trading engine started (standby, no strategy)"
        );
        Ok(())
    }

    async fn stop(&self) -> Result<(), CollaboratorError> {
        let heartbeat = self
            .heartbeat
            .lock()
            .take()
            .ok_or_else(|| CollaboratorError::new("trading engine not running"))?;

        let _ = heartbeat.shutdown.send(true);
        if let Some(handle) = heartbeat.handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Heartbeat task did not shut down cleanly");
            }
        }

        info!("Trading engine stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use misty_wallet::WalletConfig;

    fn engine(secs: u64) -> StandbyEngine {
        StandbyEngine::new(
            EngineConfig {
                heartbeat_interval_secs: secs,
            },
            Arc::new(Ledger::new(WalletConfig::default())),
        )
    }

    #[tokio::test]
    async fn test_start_stop_cycle() {
        let engine = engine(1);
        assert_eq!(engine.name(), "trading_engine");
        assert!(!engine.is_active());

        engine.start().await.unwrap();
        assert!(engine.is_active());
        tokio::time::sleep(Duration::from_millis(10)).await;
        engine.stop().await.unwrap();
        assert!(!engine.is_active());

        engine.start().await.unwrap();
        engine.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_double_start_is_error() {
        let engine = engine(0);
        engine.start().await.unwrap();
        let err = engine.start().await.unwrap_err();
        assert_eq!(err.message(), "trading engine already running");
        engine.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_error() {
        let err = engine(0).stop().await.unwrap_err();
        assert_eq!(err.message(), "trading engine not running");
    }
}
