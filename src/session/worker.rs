//! Sample Worker
//!
//! The background producer. Each loop iteration:
//! 1. stop set → exit
//! 2. pause set → sleep one pause quantum, re-check
//! 3. otherwise increment the counter, build a sample, push it, and idle for
//!    one emission interval
//!
//! The worker only reads the control signals; the controller owns them.
//! The emission-interval idle is sliced into pause quanta with a stop check
//! between slices, so a stop request lands within one quantum.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::models::Sample;
use crate::session::counter::StepCounter;
use crate::session::handoff::SampleSender;
use crate::session::signals::ControlSignals;

/// Default pause between emissions
pub const DEFAULT_EMISSION_INTERVAL: Duration = Duration::from_secs(2);

/// Default re-check interval while paused
pub const DEFAULT_PAUSE_QUANTUM: Duration = Duration::from_millis(100);

/// Worker timing parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerTiming {
    /// Idle time after each emitted sample
    pub emission_interval: Duration,
    /// Idle time per check while paused; also the stop-check granularity
    pub pause_quantum: Duration,
}

impl Default for WorkerTiming {
    fn default() -> Self {
        WorkerTiming {
            emission_interval: DEFAULT_EMISSION_INTERVAL,
            pause_quantum: DEFAULT_PAUSE_QUANTUM,
        }
    }
}

impl WorkerTiming {
    pub fn new(emission_interval: Duration, pause_quantum: Duration) -> Self {
        WorkerTiming {
            emission_interval,
            pause_quantum,
        }
    }

    /// Expected upper bound for a stop request to be honoured
    pub fn stop_latency_bound(&self) -> Duration {
        self.pause_quantum.min(self.emission_interval)
    }
}

/// Identity of the calling execution unit (kernel thread id)
pub fn current_producer_id() -> i32 {
    nix::unistd::gettid().as_raw()
}

/// Everything a worker needs, moved onto its own thread
#[derive(Debug)]
pub struct SampleWorker {
    sender: SampleSender,
    signals: ControlSignals,
    counter: StepCounter,
    timing: WorkerTiming,
}

impl SampleWorker {
    pub fn new(
        sender: SampleSender,
        signals: ControlSignals,
        counter: StepCounter,
        timing: WorkerTiming,
    ) -> Self {
        SampleWorker {
            sender,
            signals,
            counter,
            timing,
        }
    }

    /// Run until the stop signal is observed
    pub fn run(self) {
        let producer_id = current_producer_id();
        let mut emitted: u64 = 0;
        log::info!(
            "[WORKER] Started (producer_id={}, interval={:?}, quantum={:?})",
            producer_id,
            self.timing.emission_interval,
            self.timing.pause_quantum
        );

        loop {
            if self.signals.should_stop() {
                break;
            }

            if self.signals.is_paused() {
                thread::sleep(self.timing.pause_quantum);
                continue;
            }

            let step = self.counter.increment();
            let sample = Sample::now(step, producer_id);
            match self.sender.push(sample) {
                Ok(()) => {
                    emitted += 1;
                    log::debug!("[WORKER] Emitted step {}", step);
                }
                Err(e) => {
                    log::warn!("[WORKER] {}", e);
                }
            }

            self.idle(self.timing.emission_interval);
        }

        log::info!(
            "[WORKER] Stopped after {} samples (producer_id={})",
            emitted,
            producer_id
        );
    }

    /// Sleep for `total`, waking every pause quantum to check for stop
    fn idle(&self, total: Duration) {
        let deadline = Instant::now() + total;
        let slice = self.timing.pause_quantum.max(Duration::from_millis(1));
        loop {
            if self.signals.should_stop() {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            thread::sleep(slice.min(deadline - now));
        }
    }
}

/// Creates the execution unit a worker runs on
pub trait WorkerLauncher {
    fn launch(&self, worker: SampleWorker) -> io::Result<JoinHandle<()>>;
}

/// Production launcher: one named OS thread per worker
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadLauncher;

impl WorkerLauncher for ThreadLauncher {
    fn launch(&self, worker: SampleWorker) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("sample-worker".to_string())
            .spawn(move || worker.run())
    }
}
