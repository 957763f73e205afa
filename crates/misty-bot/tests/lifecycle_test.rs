//! End-to-end lifecycle tests with the real ledger and monitor and
//! recording fakes for the engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use tokio::sync::Notify;

use misty_bot::{EngineConfig, StandbyEngine};
use misty_core::{Amount, Collaborator, CollaboratorError, Secret};
use misty_lifecycle::{BotController, LifecycleError, LifecycleOptions, RequiredSettings, RunState};
use misty_telemetry::{MonitorConfig, MonitoringService};
use misty_wallet::{Ledger, WalletConfig};

/// Shared call log.
type Calls = Arc<Mutex<Vec<String>>>;

/// Engine fake that records calls, can hold `start` until released and
/// fails its first `failures` starts.
struct RecordingEngine {
    calls: Calls,
    gate: Option<Arc<Notify>>,
    failures: AtomicUsize,
}

#[async_trait]
impl Collaborator for RecordingEngine {
    fn name(&self) -> &'static str {
        "trading_engine"
    }

    async fn start(&self) -> Result<(), CollaboratorError> {
        self.calls.lock().push("engine.start".to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let remaining = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if remaining.is_ok() {
            return Err(CollaboratorError::new("no route to exchange"));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), CollaboratorError> {
        self.calls.lock().push("engine.stop".to_string());
        Ok(())
    }
}

fn settings() -> RequiredSettings {
    RequiredSettings {
        private_key: Some(Secret::new("test-key")),
        rpc_endpoint: Some("http://localhost:8899".to_string()),
        token_address: Some("Tok111".to_string()),
    }
}

fn quiet_monitor() -> Arc<MonitoringService> {
    Arc::new(MonitoringService::new(MonitorConfig {
        report_interval_secs: 0,
    }))
}

struct Harness {
    controller: Arc<BotController>,
    monitor: Arc<MonitoringService>,
    calls: Calls,
}

fn harness(
    settings: RequiredSettings,
    gate: Option<Arc<Notify>>,
    failures: usize,
    options: LifecycleOptions,
) -> Harness {
    let calls: Calls = Arc::default();
    let monitor = quiet_monitor();
    let engine = Arc::new(RecordingEngine {
        calls: calls.clone(),
        gate,
        failures: AtomicUsize::new(failures),
    });
    let controller = Arc::new(BotController::new(
        settings,
        Arc::new(Ledger::new(WalletConfig::default())),
        monitor.clone(),
        engine,
        options,
    ));
    Harness {
        controller,
        monitor,
        calls,
    }
}

/// Wait until the controller publishes `state`.
async fn wait_for(controller: &BotController, state: RunState) {
    let mut rx = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| *s == state))
        .await
        .expect("state not reached in time")
        .expect("state channel closed");
}

#[tokio::test]
async fn test_full_session_with_standby_engine() {
    let ledger = Arc::new(Ledger::new(WalletConfig::default()));
    let monitor = quiet_monitor();
    let engine = Arc::new(StandbyEngine::new(
        EngineConfig {
            heartbeat_interval_secs: 1,
        },
        ledger.clone(),
    ));
    let controller = BotController::new(
        settings(),
        ledger.clone(),
        monitor.clone(),
        engine.clone(),
        LifecycleOptions::default(),
    );

    controller.start().await.unwrap();
    assert!(controller.is_running());
    assert!(ledger.is_initialized());
    assert!(monitor.is_active());
    assert!(engine.is_active());

    ledger.deposit(dec!(100)).unwrap();
    ledger.withdraw(dec!(30)).unwrap();
    assert!(ledger.withdraw(dec!(1000)).is_err());

    let status = controller.status();
    assert_eq!(status.balance, Amount::new(dec!(70)));
    assert_eq!(status.transaction_count, 2);

    controller.stop().await.unwrap();
    assert_eq!(controller.state(), RunState::Stopped);
    assert!(!monitor.is_active());
    assert!(!engine.is_active());

    // Ledger survives a stop
    assert_eq!(ledger.balance(), Amount::new(dec!(70)));

    controller.start().await.unwrap();
    assert_eq!(monitor.stats().sessions, 2);
    controller.stop().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_start_has_one_winner() {
    let gate = Arc::new(Notify::new());
    let h = harness(settings(), Some(gate.clone()), 0, LifecycleOptions::default());

    let first = tokio::spawn({
        let controller = h.controller.clone();
        async move { controller.start().await }
    });
    wait_for(&h.controller, RunState::Starting).await;

    let second = h.controller.start().await;
    assert!(matches!(second, Err(LifecycleError::AlreadyTransitioning)));

    gate.notify_one();
    first.await.unwrap().unwrap();
    assert!(h.controller.is_running());
    assert_eq!(
        h.calls.lock().iter().filter(|c| *c == "engine.start").count(),
        1
    );

    h.controller.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_waits_for_in_flight_start() {
    let gate = Arc::new(Notify::new());
    let h = harness(settings(), Some(gate.clone()), 0, LifecycleOptions::default());

    let start = tokio::spawn({
        let controller = h.controller.clone();
        async move { controller.start().await }
    });
    wait_for(&h.controller, RunState::Starting).await;

    let stop = tokio::spawn({
        let controller = h.controller.clone();
        async move { controller.stop().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!stop.is_finished());

    gate.notify_one();
    start.await.unwrap().unwrap();
    stop.await.unwrap().unwrap();

    assert_eq!(h.controller.state(), RunState::Stopped);
    assert_eq!(
        *h.calls.lock(),
        vec!["engine.start".to_string(), "engine.stop".to_string()]
    );
}

#[tokio::test]
async fn test_missing_settings_touch_nothing() {
    let h = harness(
        RequiredSettings {
            rpc_endpoint: None,
            ..settings()
        },
        None,
        0,
        LifecycleOptions::default(),
    );

    match h.controller.start().await {
        Err(LifecycleError::ConfigurationInvalid { missing }) => {
            assert_eq!(missing, vec!["rpc_endpoint"]);
        }
        other => panic!("expected ConfigurationInvalid, got {other:?}"),
    }
    assert!(!h.controller.is_running());
    assert!(!h.monitor.is_active());
    assert!(!h.controller.ledger().is_initialized());
    assert!(h.calls.lock().is_empty());
}

#[tokio::test]
async fn test_engine_failure_without_rollback_leaves_monitor_until_stop() {
    let h = harness(settings(), None, 1, LifecycleOptions::default());

    let err = h.controller.start().await.unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::Collaborator {
            name: "trading_engine",
            ..
        }
    ));
    assert_eq!(h.controller.state(), RunState::Stopped);
    assert!(h.monitor.is_active());

    h.controller.stop().await.unwrap();
    assert_eq!(h.controller.state(), RunState::Stopped);
    assert!(!h.monitor.is_active());
}

#[tokio::test]
async fn test_retry_after_engine_failure_without_rollback() {
    let h = harness(settings(), None, 1, LifecycleOptions::default());

    assert!(h.controller.start().await.is_err());
    assert!(h.monitor.is_active());

    h.controller.start().await.unwrap();
    assert!(h.controller.is_running());
    assert_eq!(h.monitor.stats().sessions, 2);

    h.controller.stop().await.unwrap();
    assert!(!h.monitor.is_active());
    assert_eq!(
        *h.calls.lock(),
        vec!["engine.start", "engine.start", "engine.stop"]
    );
}

#[tokio::test]
async fn test_engine_failure_with_rollback_stops_monitor() {
    let h = harness(
        settings(),
        None,
        1,
        LifecycleOptions {
            rollback_on_failure: true,
        },
    );

    assert!(h.controller.start().await.is_err());
    assert_eq!(h.controller.state(), RunState::Stopped);
    assert!(!h.monitor.is_active());
}
