//! WebSocket broadcast functionality.
//!
//! The broadcaster pushes a status update at a fixed interval and an extra
//! `state_changed` message whenever the run state moves.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::state::DashboardState;
use crate::types::DashboardMessage;

/// Run the broadcaster task until the controller goes away.
pub async fn run_broadcaster(
    state: DashboardState,
    tx: broadcast::Sender<String>,
    interval_ms: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
    let mut state_rx = state.subscribe_state();

    loop {
        let msg = tokio::select! {
            _ = interval.tick() => DashboardMessage::Update(state.collect_snapshot()),
            changed = state_rx.changed() => {
                if changed.is_err() {
                    debug!("Run state channel closed, stopping broadcaster");
                    break;
                }
                let run_state = *state_rx.borrow_and_update();
                DashboardMessage::StateChanged {
                    timestamp_ms: Utc::now().timestamp_millis(),
                    state: run_state,
                }
            }
        };
        send(&tx, &msg);
    }
}

fn send(tx: &broadcast::Sender<String>, msg: &DashboardMessage) {
    match serde_json::to_string(msg) {
        Ok(json) => match tx.send(json) {
            Ok(n) => trace!(receivers = n, "Broadcast update sent"),
            // No receivers - normal when no clients are connected
            Err(_) => trace!("No WebSocket receivers connected"),
        },
        Err(e) => debug!(error = %e, "Failed to serialize dashboard update"),
    }
}
