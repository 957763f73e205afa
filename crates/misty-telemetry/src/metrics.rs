//! Prometheus metrics for the Misty bot.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A registration failure means a
//! duplicate metric name, which is a programming error that should crash at
//! first use rather than silently drop data.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_int_gauge, CounterVec, Encoder, Gauge,
    IntGauge, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Recorded wallet transactions.
/// Labels: kind (deposit/withdrawal)
pub static WALLET_TRANSACTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "misty_wallet_transactions_total",
        "Total recorded wallet transactions",
        &["kind"]
    )
    .unwrap()
});

/// Rejected wallet mutations.
/// Labels: reason (invalid_amount/insufficient_balance)
pub static WALLET_REJECTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "misty_wallet_rejected_total",
        "Total rejected wallet mutations",
        &["reason"]
    )
    .unwrap()
});

/// Current wallet balance.
pub static WALLET_BALANCE: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!("misty_wallet_balance", "Current wallet balance").unwrap()
});

/// Bot run state (1 = running, 0 = stopped).
pub static BOT_RUNNING: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("misty_bot_running", "Bot run state (1=running)").unwrap()
});

/// Lifecycle events.
/// Labels: event (started/stopped/start_failed/start_rejected)
pub static LIFECYCLE_TRANSITIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "misty_lifecycle_transitions_total",
        "Total bot lifecycle events",
        &["event"]
    )
    .unwrap()
});

/// Collaborator hook failures.
/// Labels: collaborator, phase (start/stop/rollback)
pub static COLLABORATOR_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "misty_collaborator_failures_total",
        "Total collaborator lifecycle hook failures",
        &["collaborator", "phase"]
    )
    .unwrap()
});

/// Monitoring sessions started.
pub static MONITOR_SESSIONS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "misty_monitor_sessions",
        "Number of monitoring sessions started in this process"
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a committed wallet transaction and the resulting balance.
    pub fn wallet_transaction(kind: &str, balance: f64) {
        WALLET_TRANSACTIONS_TOTAL.with_label_values(&[kind]).inc();
        WALLET_BALANCE.set(balance);
    }

    /// Record a rejected wallet mutation.
    pub fn wallet_rejected(reason: &str) {
        WALLET_REJECTED_TOTAL.with_label_values(&[reason]).inc();
    }

    /// Set the bot run state gauge.
    pub fn bot_running(running: bool) {
        BOT_RUNNING.set(if running { 1 } else { 0 });
    }

    /// Record a lifecycle event.
    pub fn lifecycle_event(event: &str) {
        LIFECYCLE_TRANSITIONS_TOTAL.with_label_values(&[event]).inc();
    }

    /// Record a collaborator hook failure.
    pub fn collaborator_failure(collaborator: &str, phase: &str) {
        COLLABORATOR_FAILURES_TOTAL
            .with_label_values(&[collaborator, phase])
            .inc();
    }

    /// Record a monitoring session start.
    pub fn monitor_session() {
        MONITOR_SESSIONS.inc();
    }

    /// Total transactions recorded for a kind.
    pub fn transaction_count(kind: &str) -> u64 {
        WALLET_TRANSACTIONS_TOTAL.with_label_values(&[kind]).get() as u64
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let families = prometheus::gather();
        let mut buf = Vec::new();
        encoder
            .encode(&families, &mut buf)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_counters_increase() {
        let before = Metrics::transaction_count("deposit");
        Metrics::wallet_transaction("deposit", 10.0);
        assert!(Metrics::transaction_count("deposit") > before);
    }

    #[test]
    fn test_gather_text_contains_registered_metrics() {
        Metrics::bot_running(false);
        Metrics::lifecycle_event("started");
        let text = Metrics::gather_text().unwrap();
        assert!(text.contains("misty_bot_running"));
        assert!(text.contains("misty_lifecycle_transitions_total"));
    }
}
