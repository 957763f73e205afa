//! Dashboard API and WebSocket message types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use misty_core::{Amount, Transaction};
use misty_lifecycle::{BotStatus, RunState};
use misty_telemetry::{LogEntry, MonitorStats};

/// Complete status as served by `/api/status` and the WebSocket stream.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    /// Snapshot timestamp (Unix ms).
    pub timestamp_ms: i64,
    #[serde(flatten)]
    pub bot: BotStatus,
    /// Monitoring stats (None when no monitor is attached).
    pub monitor: Option<MonitorStats>,
}

/// WebSocket message types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardMessage {
    /// Full snapshot, sent once on connect.
    Snapshot(StatusSnapshot),
    /// Periodic update.
    Update(StatusSnapshot),
    /// Run state changed.
    StateChanged { timestamp_ms: i64, state: RunState },
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of deposit and withdraw requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub balance: Amount,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_changed_tagging() {
        let msg = DashboardMessage::StateChanged {
            timestamp_ms: 1,
            state: RunState::Running,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "state_changed");
        assert_eq!(json["state"], "running");
    }

    #[test]
    fn test_amount_request_accepts_number_and_string() {
        let a: AmountRequest = serde_json::from_str(r#"{"amount": 100}"#).unwrap();
        let b: AmountRequest = serde_json::from_str(r#"{"amount": "100"}"#).unwrap();
        assert_eq!(a.amount, b.amount);
    }
}
