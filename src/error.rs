//! Unified error type hierarchy for Async Dashboard
//!
//! Provides structured error handling with SessionError, HandoffError,
//! ExportError and ConfigError.

use std::io;
use thiserror::Error;

/// Errors surfaced by session lifecycle operations.
///
/// Only worker spawn failures reach the caller of `start()`. Empty-channel
/// races and stale counter reads are normal operation, not errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to spawn sample worker: {0}")]
    SpawnFailure(#[source] io::Error),

    #[error("Sample export failed: {0}")]
    Export(#[from] ExportError),
}

/// Handoff channel push errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandoffError {
    #[error("Handoff channel closed, sample {step} dropped")]
    Closed { step: u64 },
}

/// CSV serialization and parsing errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error during export: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected CSV header: {0}")]
    UnexpectedHeader(String),
}

/// Configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Top-level result type for binary glue code.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
