//! Shared step counter
//!
//! Incremented once per emitted sample by the worker and reset by the
//! controller on clear. Every mutation happens under the mutex, so
//! increments are globally ordered. Reads taken while the worker is live
//! may be stale by one increment.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mutex-guarded monotonic step counter
#[derive(Clone, Debug, Default)]
pub struct StepCounter {
    value: Arc<Mutex<u64>>,
}

impl StepCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, u64> {
        // A panic while holding the lock cannot leave a torn u64 behind
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Increment and return the new value
    pub fn increment(&self) -> u64 {
        let mut value = self.guard();
        *value += 1;
        *value
    }

    /// Current value (possibly stale by one increment)
    pub fn get(&self) -> u64 {
        *self.guard()
    }

    /// Reset to zero
    pub fn reset(&self) {
        *self.guard() = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_counter_starts_at_zero() {
        assert_eq!(StepCounter::new().get(), 0);
    }

    #[test]
    fn test_increment_returns_new_value() {
        let counter = StepCounter::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_reset() {
        let counter = StepCounter::new();
        counter.increment();
        counter.increment();
        counter.reset();
        assert_eq!(counter.get(), 0);
        assert_eq!(counter.increment(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let counter = StepCounter::new();
        let other = counter.clone();
        other.increment();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_concurrent_increments_are_unique() {
        let counter = StepCounter::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || (0..250).map(|_| counter.increment()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        seen.sort_unstable();

        assert_eq!(seen, (1..=1000).collect::<Vec<u64>>());
        assert_eq!(counter.get(), 1000);
    }
}
