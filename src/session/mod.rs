//! Supervised Sampling Session
//!
//! One background worker emits timestamped samples while the controller
//! drains them for display and export.
//!
//! ## Architecture
//! - **Counter**: mutex-guarded step counter shared by worker and controller
//! - **Signals**: atomic stop/pause flags written by the controller only
//! - **Handoff**: unbounded FIFO channel from worker to controller
//! - **Worker**: the sampling loop, run on its own OS thread
//! - **Controller**: start/pause/stop/clear lifecycle and the local buffer
//!
//! ```text
//! SessionController --spawn--> SampleWorker --Sample--> handoff --drain--> buffer
//! ```

pub mod counter;
pub mod signals;
pub mod handoff;
pub mod worker;
pub mod controller;

use std::time::Duration;

use crate::models::RunPhase;

pub use controller::SessionController;
pub use counter::StepCounter;
pub use handoff::{handoff, SampleReceiver, SampleSender};
pub use signals::{ControlSignals, SignalFlag};
pub use worker::{current_producer_id, SampleWorker, ThreadLauncher, WorkerLauncher, WorkerTiming};

/// Poll cadence for the external refresh driver.
///
/// Aligned with the worker's own timing: fast while paused so a resume
/// shows up promptly, one emission interval while running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshCadence {
    pub running: Duration,
    pub paused: Duration,
}

impl Default for RefreshCadence {
    fn default() -> Self {
        RefreshCadence {
            running: Duration::from_secs(2),
            paused: Duration::from_millis(100),
        }
    }
}

impl RefreshCadence {
    pub fn new(running: Duration, paused: Duration) -> Self {
        RefreshCadence { running, paused }
    }

    /// Wait before the next drain for the given phase
    pub fn interval_for(&self, phase: RunPhase) -> Duration {
        match phase {
            RunPhase::Paused => self.paused,
            RunPhase::Running | RunPhase::Stopped => self.running,
        }
    }
}
