//! Bot controller: the single owner of the run state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use misty_core::{Amount, Collaborator, Transaction};
use misty_telemetry::Metrics;
use misty_wallet::Ledger;

use crate::error::{LifecycleError, LifecycleResult};
use crate::settings::RequiredSettings;
use crate::state::RunState;

/// Controller behaviour switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleOptions {
    /// Stop collaborators already started in a failed start attempt.
    ///
    /// Off: a failed start leaves earlier collaborators running while the
    /// bot reports `Stopped`. The next `start` or `stop` shuts them down.
    #[serde(default)]
    pub rollback_on_failure: bool,
}

/// Status exposed to the boundary layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotStatus {
    pub running: bool,
    pub state: RunState,
    pub balance: Amount,
    pub transaction_count: usize,
    pub currency: String,
}

/// Publishes `Stopped` when dropped unless disarmed.
///
/// Keeps the published state honest if a transition future is cancelled
/// mid-await by the caller.
struct ResetOnDrop<'a> {
    state_tx: &'a watch::Sender<RunState>,
    armed: bool,
}

impl<'a> ResetOnDrop<'a> {
    fn new(state_tx: &'a watch::Sender<RunState>) -> Self {
        Self {
            state_tx,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state_tx.send_replace(RunState::Stopped);
            Metrics::bot_running(false);
        }
    }
}

/// Sequences bot startup and shutdown.
///
/// Start and stop are mutually exclusive. A `start` that finds another
/// transition in flight fails fast; a `stop` waits for it, so stopping
/// always completes.
pub struct BotController {
    settings: RequiredSettings,
    options: LifecycleOptions,
    ledger: Arc<Ledger>,
    monitor: Arc<dyn Collaborator>,
    engine: Arc<dyn Collaborator>,
    /// Transition guard. Holds the collaborators started by the current or
    /// last unfinished start attempt; empty once a start succeeds.
    transition: Mutex<Vec<Arc<dyn Collaborator>>>,
    state_tx: watch::Sender<RunState>,
}

impl BotController {
    pub fn new(
        settings: RequiredSettings,
        ledger: Arc<Ledger>,
        monitor: Arc<dyn Collaborator>,
        engine: Arc<dyn Collaborator>,
        options: LifecycleOptions,
    ) -> Self {
        let (state_tx, _) = watch::channel(RunState::Stopped);
        Self {
            settings,
            options,
            ledger,
            monitor,
            engine,
            transition: Mutex::new(Vec::new()),
            state_tx,
        }
    }

    /// Start the bot.
    ///
    /// # Errors
    /// - `AlreadyTransitioning` if another start or stop is in flight
    /// - `AlreadyRunning` if the bot is running
    /// - `ConfigurationInvalid` listing every missing required setting
    /// - `Collaborator` if a collaborator fails to start; the bot stays stopped
    pub async fn start(&self) -> LifecycleResult<()> {
        let mut started = self.transition.try_lock().map_err(|_| {
            Metrics::lifecycle_event("start_rejected");
            LifecycleError::AlreadyTransitioning
        })?;

        if self.state() == RunState::Running {
            Metrics::lifecycle_event("start_rejected");
            return Err(LifecycleError::AlreadyRunning);
        }

        let missing = self.settings.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "Refusing to start: required configuration missing");
            Metrics::lifecycle_event("start_rejected");
            return Err(LifecycleError::ConfigurationInvalid { missing });
        }

        info!("Starting Misty bot");
        let reset = ResetOnDrop::new(&self.state_tx);
        self.publish(RunState::Starting);

        if !started.is_empty() {
            let leftovers = std::mem::take(&mut *started);
            info!(
                collaborators = ?names(&leftovers),
                "Stopping collaborators left by an earlier failed start"
            );
            self.stop_newest_first(&leftovers, "cleanup").await;
        }

        let sequence: [Arc<dyn Collaborator>; 3] = [
            self.ledger.clone() as Arc<dyn Collaborator>,
            self.monitor.clone(),
            self.engine.clone(),
        ];

        for collaborator in sequence {
            debug!(collaborator = collaborator.name(), "Starting collaborator");
            if let Err(source) = collaborator.start().await {
                let name = collaborator.name();
                error!(collaborator = name, error = %source, "Collaborator failed to start");
                Metrics::collaborator_failure(name, "start");
                Metrics::lifecycle_event("start_failed");

                if self.options.rollback_on_failure {
                    let attempted = std::mem::take(&mut *started);
                    self.stop_newest_first(&attempted, "rollback").await;
                } else if !started.is_empty() {
                    warn!(
                        left_running = ?names(&started),
                        "Start aborted without rollback; next start or stop shuts these down"
                    );
                }

                // `reset` publishes Stopped on drop
                return Err(LifecycleError::Collaborator { name, source });
            }
            started.push(collaborator);
        }

        started.clear();
        reset.disarm();
        self.publish(RunState::Running);
        Metrics::bot_running(true);
        Metrics::lifecycle_event("started");
        info!("Misty bot started");
        Ok(())
    }

    /// Stop the bot.
    ///
    /// From `Stopped` this only shuts down collaborators left running by a
    /// failed start, if any. Collaborator failures are logged and the bot
    /// always ends up `Stopped`.
    pub async fn stop(&self) -> LifecycleResult<()> {
        let mut started = self.transition.lock().await;

        if self.state() == RunState::Stopped {
            if started.is_empty() {
                debug!("Stop requested while already stopped");
            } else {
                let leftovers = std::mem::take(&mut *started);
                info!(
                    collaborators = ?names(&leftovers),
                    "Stopping collaborators left by a failed start"
                );
                self.stop_newest_first(&leftovers, "cleanup").await;
            }
            return Ok(());
        }

        info!("Stopping Misty bot");
        // Always armed: Stopped is published on every exit path
        let _reset = ResetOnDrop::new(&self.state_tx);
        self.publish(RunState::Stopping);

        for collaborator in [&self.engine, &self.monitor] {
            if let Err(e) = collaborator.stop().await {
                error!(
                    collaborator = collaborator.name(),
                    error = %e,
                    "Collaborator failed to stop, continuing shutdown"
                );
                Metrics::collaborator_failure(collaborator.name(), "stop");
            }
        }

        Metrics::lifecycle_event("stopped");
        info!("Misty bot stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    pub fn state(&self) -> RunState {
        *self.state_tx.borrow()
    }

    /// Subscribe to run state changes.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state_tx.subscribe()
    }

    pub fn status(&self) -> BotStatus {
        let state = self.state();
        BotStatus {
            running: state == RunState::Running,
            state,
            balance: self.ledger.balance(),
            transaction_count: self.ledger.transaction_count(),
            currency: self.ledger.currency().to_string(),
        }
    }

    pub fn history(&self) -> Vec<Transaction> {
        self.ledger.history()
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    fn publish(&self, state: RunState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "Run state changed");
        }
    }

    /// Best-effort stop of collaborators from a failed attempt, newest first.
    async fn stop_newest_first(
        &self,
        collaborators: &[Arc<dyn Collaborator>],
        phase: &'static str,
    ) {
        for collaborator in collaborators.iter().rev() {
            match collaborator.stop().await {
                Ok(()) => info!(collaborator = collaborator.name(), phase, "Collaborator stopped"),
                Err(e) => {
                    error!(
                        collaborator = collaborator.name(),
                        phase,
                        error = %e,
                        "Failed to stop collaborator"
                    );
                    Metrics::collaborator_failure(collaborator.name(), phase);
                }
            }
        }
    }
}

fn names(collaborators: &[Arc<dyn Collaborator>]) -> Vec<&'static str> {
    collaborators.iter().map(|c| c.name()).collect()
}
