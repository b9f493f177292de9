//! Configuration module for the dashboard binary.
//!
//! Timing, refresh cadence and output locations live in a JSON settings file
//! (see `loader`). The session core never reads configuration directly; the
//! binary converts a `DashboardConfig` into `WorkerTiming` and
//! `RefreshCadence` values.
//!
//! # Module Structure
//!
//! - `loader`: locating, loading, saving and validating settings files

pub mod loader;

use crate::error::ConfigError;
use crate::session::{RefreshCadence, WorkerTiming};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Dashboard settings persisted as JSON
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Worker idle time after each sample (ms)
    pub emission_interval_ms: u64,
    /// Worker re-check interval while paused (ms)
    pub pause_quantum_ms: u64,
    /// Poll interval while running (ms)
    pub running_refresh_ms: u64,
    /// Poll interval while paused (ms)
    pub paused_refresh_ms: u64,
    /// Destination of the CSV export
    pub export_path: PathBuf,
    /// Session log directory; `./logs` when unset
    pub log_dir: Option<PathBuf>,
    /// Stop automatically after this many seconds; run until Ctrl-C when unset
    pub run_duration_secs: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            emission_interval_ms: 2000,
            pause_quantum_ms: 100,
            running_refresh_ms: 2000,
            paused_refresh_ms: 100,
            export_path: PathBuf::from("data.csv"),
            log_dir: None,
            run_duration_secs: None,
        }
    }
}

impl DashboardConfig {
    /// Check that every interval is positive and the pause quantum fits
    /// inside one emission interval
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("emission_interval_ms", self.emission_interval_ms),
            ("pause_quantum_ms", self.pause_quantum_ms),
            ("running_refresh_ms", self.running_refresh_ms),
            ("paused_refresh_ms", self.paused_refresh_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        if self.pause_quantum_ms > self.emission_interval_ms {
            return Err(ConfigError::ValidationFailed(format!(
                "pause_quantum_ms ({}) exceeds emission_interval_ms ({})",
                self.pause_quantum_ms, self.emission_interval_ms
            )));
        }

        if self.export_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "export_path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timing(&self) -> WorkerTiming {
        WorkerTiming::new(
            Duration::from_millis(self.emission_interval_ms),
            Duration::from_millis(self.pause_quantum_ms),
        )
    }

    pub fn cadence(&self) -> RefreshCadence {
        RefreshCadence::new(
            Duration::from_millis(self.running_refresh_ms),
            Duration::from_millis(self.paused_refresh_ms),
        )
    }

    pub fn run_duration(&self) -> Option<Duration> {
        self.run_duration_secs.map(Duration::from_secs)
    }

    /// Instant at which a run started at `start` should end.
    ///
    /// `None` when no duration is set or the sum overflows `Instant`; both
    /// mean the run lasts until interrupted.
    pub fn deadline_from(&self, start: Instant) -> Option<Instant> {
        self.run_duration().and_then(|d| start.checked_add(d))
    }
}
