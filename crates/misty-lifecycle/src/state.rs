//! Bot run state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one bot run.
///
/// `Stopped -> Starting -> Running -> Stopping -> Stopped`. A failed start
/// goes `Starting -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
