//! Bot lifecycle controller.
//!
//! Sequences startup and shutdown of the wallet, monitoring service and
//! trading engine behind a configuration gate:
//!
//! ```text
//! start: validate settings -> wallet.start -> monitor.start -> engine.start -> Running
//! stop:  engine.stop -> monitor.stop -> Stopped   (failures logged, never fatal)
//! ```
//!
//! The run state is owned by [`BotController`] and only changes through
//! `start`/`stop`. Readers observe it through [`BotController::state`] or a
//! watch channel and never block on an in-flight transition.

pub mod controller;
pub mod error;
pub mod settings;
pub mod state;

pub use controller::{BotController, BotStatus, LifecycleOptions};
pub use error::{LifecycleError, LifecycleResult};
pub use settings::RequiredSettings;
pub use state::RunState;
