//! Core data structures shared by the worker, the controller and the
//! rendering/export layer.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One timestamped sample emitted by the worker.
///
/// Immutable once built. Field order matches the CSV column order
/// `timestamp,step,pid`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock instant of emission (serialized as an RFC 3339 string)
    pub timestamp: DateTime<Local>,
    /// Counter value at emission, strictly increasing within one run
    pub step: u64,
    /// OS thread id of the worker that produced the sample
    #[serde(rename = "pid")]
    pub producer_id: i32,
}

impl Sample {
    pub fn new(timestamp: DateTime<Local>, step: u64, producer_id: i32) -> Self {
        Sample {
            timestamp,
            step,
            producer_id,
        }
    }

    /// Stamp a sample with the current wall-clock time
    pub fn now(step: u64, producer_id: i32) -> Self {
        Sample::new(Local::now(), step, producer_id)
    }
}

/// Run phase as seen by the status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// No live worker
    Stopped,
    /// Worker alive and emitting
    Running,
    /// Worker alive, pause signal set
    Paused,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Stopped => write!(f, "STOPPED"),
            RunPhase::Running => write!(f, "RUNNING"),
            RunPhase::Paused => write!(f, "PAUSED"),
        }
    }
}

/// Snapshot returned by `SessionController::status()`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionStatus {
    pub phase: RunPhase,
    /// Number of samples drained into the local buffer so far
    pub step_count: usize,
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        self.phase != RunPhase::Stopped
    }

    /// Text for the status line rendered by the UI layer
    pub fn status_line(&self) -> String {
        if self.is_active() {
            format!("Status: {} | Steps: {}", self.phase, self.step_count)
        } else {
            "Click \"Start\" to begin.".to_string()
        }
    }
}
