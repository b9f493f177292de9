//! Async Dashboard Rust Backend
//!
//! Supervises a single long-running background worker that periodically
//! emits timestamped samples, while a polling consumer drains them for
//! display and CSV export. The worker can be started, paused/resumed,
//! stopped and cleared at any time without corrupting or losing samples.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Sample, run phase and status types
//! - **session**: Counter, control signals, handoff channel, worker and controller
//! - **export**: CSV serialization of collected samples
//! - **config**: JSON settings for the dashboard binary
//! - **log_collector**: Channel-backed `log` backend writing session log files

// Core foundational modules
pub mod error;
pub mod models;

// Worker lifecycle and synchronization primitives
pub mod session;

// CSV persistence of the sample buffer
pub mod export;

// Settings file handling
pub mod config;

// Robust, decoupled logging system
pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

// Re-export log collector for use throughout the system
pub use log_collector::{LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{ConfigError, ExportError, HandoffError, Result, SessionError};

pub use models::{RunPhase, Sample, SessionStatus};

pub use session::{RefreshCadence, SessionController, WorkerTiming};

pub use config::DashboardConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
