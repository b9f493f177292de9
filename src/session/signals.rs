//! Stop and pause control signals
//!
//! Single writer (the controller), many readers (the worker). Plain atomic
//! booleans with release/acquire ordering, no lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared boolean flag supporting set/clear/is-set
#[derive(Clone, Debug, Default)]
pub struct SignalFlag(Arc<AtomicBool>);

impl SignalFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Flip the flag and return the new value
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::AcqRel)
    }
}

/// The pair of signals observed by the worker
#[derive(Clone, Debug, Default)]
pub struct ControlSignals {
    pub stop: SignalFlag,
    pub pause: SignalFlag,
}

impl ControlSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the worker to exit at its next check
    pub fn request_stop(&self) {
        self.stop.set();
    }

    pub fn should_stop(&self) -> bool {
        self.stop.is_set()
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_set()
    }

    /// Flip pause; returns true if the worker is now paused
    pub fn toggle_pause(&self) -> bool {
        self.pause.toggle()
    }

    /// Clear both signals ahead of a fresh worker
    pub fn reset(&self) {
        self.stop.clear();
        self.pause.clear();
    }
}
