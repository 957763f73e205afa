//! misty-dashboard - Web dashboard and control API for the Misty bot.
//!
//! A thin transport layer over [`BotController`](misty_lifecycle::BotController):
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        misty-bot process                      │
//! │                                                              │
//! │  ┌────────────────┐  ┌──────────┐  ┌───────────────────┐     │
//! │  │ BotController  │  │  Ledger  │  │ MonitoringService │     │
//! │  └───────┬────────┘  └────┬─────┘  └─────────┬─────────┘     │
//! │          └────────────────┼──────────────────┘               │
//! │                           ▼                                  │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │          DashboardState (aggregates data)              │  │
//! │  └──────────────────────────┬─────────────────────────────┘  │
//! │  ┌──────────────────────────┼─────────────────────────────┐  │
//! │  │       axum HTTP Server (port 5000)                     │  │
//! │  │  GET  /                → Static HTML/JS                │  │
//! │  │  GET  /api/status      → JSON status                   │  │
//! │  │  POST /api/start|stop  → lifecycle control             │  │
//! │  │  GET  /api/history     → ledger transactions           │  │
//! │  │  GET  /api/logs        → recent log lines              │  │
//! │  │  POST /api/wallet/*    → deposit / withdraw            │  │
//! │  │  GET  /metrics         → Prometheus text               │  │
//! │  │  GET  /ws              → WebSocket status stream       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use misty_dashboard::{run_server, DashboardConfig, DashboardState};
//!
//! let state = DashboardState::new(controller.clone()).with_monitor(monitor.clone());
//! run_server(state, DashboardConfig::default(), shutdown_signal()).await?;
//! ```

mod broadcast;
mod config;
mod error;
mod server;
mod state;
mod types;

pub use config::DashboardConfig;
pub use error::{ApiError, DashboardError};
pub use server::{create_router, run_server, AppState};
pub use state::DashboardState;
pub use types::{
    AmountRequest, BalanceResponse, DashboardMessage, HistoryResponse, LogsResponse,
    MessageResponse, StatusSnapshot,
};
