//! Session Controller
//!
//! Owns one run's state: the shared counter and signals, both ends of the
//! handoff channel, the local sample buffer and at most one worker handle.
//! Lifecycle calls are synchronous; `clear()` and `stop()` block until the
//! worker has observed the stop signal (at most one pause quantum with the
//! sliced idle, one emission interval in the worst case).

use std::path::Path;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::SessionError;
use crate::export;
use crate::models::{RunPhase, Sample, SessionStatus};
use crate::session::counter::StepCounter;
use crate::session::handoff::{handoff, SampleReceiver, SampleSender};
use crate::session::signals::ControlSignals;
use crate::session::worker::{SampleWorker, ThreadLauncher, WorkerLauncher, WorkerTiming};
use crate::session::RefreshCadence;

/// Controller for a single supervised sampling session
pub struct SessionController<L: WorkerLauncher = ThreadLauncher> {
    launcher: L,
    timing: WorkerTiming,
    counter: StepCounter,
    signals: ControlSignals,
    sender: SampleSender,
    receiver: SampleReceiver,
    /// Drained samples in emission order
    buffer: Vec<Sample>,
    worker: Option<JoinHandle<()>>,
}

impl SessionController<ThreadLauncher> {
    /// Create a controller that runs workers on OS threads
    pub fn new(timing: WorkerTiming) -> Self {
        Self::with_launcher(timing, ThreadLauncher)
    }
}

impl Default for SessionController<ThreadLauncher> {
    fn default() -> Self {
        Self::new(WorkerTiming::default())
    }
}

impl<L: WorkerLauncher> SessionController<L> {
    pub fn with_launcher(timing: WorkerTiming, launcher: L) -> Self {
        let (sender, receiver) = handoff();
        SessionController {
            launcher,
            timing,
            counter: StepCounter::new(),
            signals: ControlSignals::new(),
            sender,
            receiver,
            buffer: Vec::new(),
            worker: None,
        }
    }

    /// True iff a worker handle exists and its thread has not finished
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Spawn the worker. No-op if one is already alive.
    ///
    /// A spawn failure is returned to the caller and leaves the session
    /// stopped.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_running() {
            log::debug!("[SESSION] start() ignored: worker already running");
            return Ok(());
        }

        // A handle that exists but finished on its own is reaped first
        if let Some(handle) = self.worker.take() {
            log::warn!("[SESSION] Reaping worker that exited without a stop request");
            Self::reap(handle);
        }

        self.signals.reset();

        let worker = SampleWorker::new(
            self.sender.clone(),
            self.signals.clone(),
            self.counter.clone(),
            self.timing,
        );
        let handle = self.launcher.launch(worker).map_err(|e| {
            log::error!("[SESSION] Worker spawn failed: {}", e);
            SessionError::SpawnFailure(e)
        })?;

        self.worker = Some(handle);
        log::info!(
            target: "status",
            "Session started (counter={}, buffered={})",
            self.counter.get(),
            self.buffer.len()
        );
        Ok(())
    }

    /// Flip the pause signal. No-op while stopped.
    pub fn pause_toggle(&mut self) {
        if !self.is_running() {
            log::debug!("[SESSION] pause_toggle() ignored: not running");
            return;
        }

        if self.signals.toggle_pause() {
            log::info!(target: "status", "Session paused at step {}", self.counter.get());
        } else {
            log::info!(target: "status", "Session resumed at step {}", self.counter.get());
        }
    }

    /// Stop and join the worker, keeping every sample it produced.
    ///
    /// Residual samples still in the channel are drained into the buffer.
    /// Counter and buffer are kept, so a later `start()` continues the run.
    /// Returns the number of samples moved into the buffer.
    pub fn stop(&mut self) -> usize {
        self.halt_worker();
        let drained = self.receiver.drain_into(&mut self.buffer);
        log::info!(
            target: "status",
            "Session stopped ({} samples buffered, {} drained on stop)",
            self.buffer.len(),
            drained
        );
        drained
    }

    /// Whether the UI should offer "Clear": data buffered or a worker alive
    pub fn can_clear(&self) -> bool {
        !self.buffer.is_empty() || self.is_running()
    }

    /// Stop the worker and reset the run.
    ///
    /// Postcondition, whatever the prior state: buffer empty, counter 0,
    /// no worker handle, channel empty.
    pub fn clear(&mut self) {
        self.halt_worker();

        let cleared = self.buffer.len();
        self.buffer.clear();
        self.counter.reset();

        // Leftovers must not resurface after the next start()
        let discarded = self.receiver.discard();

        log::info!(
            target: "status",
            "Session cleared ({} buffered samples dropped, {} residual discarded)",
            cleared,
            discarded
        );
    }

    /// Move every ready sample from the channel into the buffer.
    ///
    /// Never blocks. A sample pushed concurrently with the final empty check
    /// is left for the next call.
    pub fn drain_into_buffer(&mut self) -> usize {
        let drained = self.receiver.drain_into(&mut self.buffer);
        if drained > 0 {
            log::debug!(
                "[SESSION] Drained {} samples (buffer={})",
                drained,
                self.buffer.len()
            );
        }
        drained
    }

    pub fn status(&self) -> SessionStatus {
        let phase = if !self.is_running() {
            RunPhase::Stopped
        } else if self.signals.is_paused() {
            RunPhase::Paused
        } else {
            RunPhase::Running
        };
        SessionStatus {
            phase,
            step_count: self.buffer.len(),
        }
    }

    /// Read-only view of the buffered samples, in emission order
    pub fn samples(&self) -> &[Sample] {
        &self.buffer
    }

    /// Counter value; may lag a concurrent increment by one
    pub fn counter_value(&self) -> u64 {
        self.counter.get()
    }

    pub fn timing(&self) -> WorkerTiming {
        self.timing
    }

    /// How long the poll driver should wait before the next drain
    pub fn refresh_interval(&self, cadence: &RefreshCadence) -> Duration {
        cadence.interval_for(self.status().phase)
    }

    /// Write the buffered samples to a CSV file
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        export::write_csv_file(path, &self.buffer)?;
        Ok(())
    }

    /// Signal stop and join the worker if one exists
    fn halt_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            self.signals.request_stop();
            log::debug!(
                "[SESSION] Waiting for worker to stop (expected within {:?})",
                self.timing.stop_latency_bound()
            );
            Self::reap(handle);
        }
    }

    fn reap(handle: JoinHandle<()>) {
        if handle.join().is_err() {
            log::error!("[SESSION] Worker panicked before shutdown");
        }
    }
}

impl<L: WorkerLauncher> Drop for SessionController<L> {
    fn drop(&mut self) {
        if self.worker.is_some() {
            log::debug!("[SESSION] Drop: stopping live worker");
            self.halt_worker();
        }
    }
}
