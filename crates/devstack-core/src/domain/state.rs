//! The per-service lifecycle state machine.
//!
//! ```text
//! undefined → stopped → starting → running → stopping → stopped
//!                                     │
//!                                     ▼
//!                                  failed      (recoverable via stop → start)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Observable state of one service, as projected from the container runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    /// No container exists for the service yet.
    Undefined,
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
}

impl ServiceState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Failed => "failed",
        }
    }

    /// Whether `start` is a legal transition from this state.
    ///
    /// `Failed` is deliberately excluded: a failed service must be stopped
    /// first, so the operator acknowledges the failure instead of looping
    /// start attempts against a broken container.
    pub const fn may_start(self) -> bool {
        matches!(self, Self::Undefined | Self::Stopped)
    }

    /// Whether `stop` is a legal transition from this state.
    pub const fn may_stop(self) -> bool {
        matches!(self, Self::Running | Self::Starting | Self::Failed)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Map a container-runtime status label onto the state machine.
    ///
    /// Labels follow the `docker compose ps` vocabulary; anything
    /// unrecognized maps to `Failed` so a surprising runtime state is never
    /// mistaken for a healthy one.
    pub fn from_runtime_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "running" | "up" | "healthy" => Self::Running,
            "created" | "restarting" | "starting" => Self::Starting,
            "paused" | "exited" | "stopped" => Self::Stopped,
            "removing" | "stopping" => Self::Stopping,
            "dead" | "unhealthy" => Self::Failed,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
