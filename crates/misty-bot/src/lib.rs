//! Misty volume bot.
//!
//! Wires the ledger, monitoring service and standby trading engine into a
//! [`BotController`](misty_lifecycle::BotController) and serves it through
//! the dashboard:
//! - Layered configuration (TOML file, `MISTY__*` and bare env overrides)
//! - Structured logging with a recent-logs buffer
//! - Start/stop from the CLI or the HTTP API

pub mod app;
pub mod config;
pub mod engine;
pub mod error;

pub use app::Application;
pub use config::{AppConfig, EngineConfig};
pub use engine::StandbyEngine;
pub use error::{AppError, AppResult};
