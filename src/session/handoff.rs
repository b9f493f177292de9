//! Worker → controller handoff channel
//!
//! An unbounded crossbeam channel: pushes never block, pops never block.
//! The controller keeps a sender alive for the whole session, so the
//! receiver never observes a disconnect in normal operation.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::error::HandoffError;
use crate::models::Sample;

/// Create a connected sender/receiver pair
pub fn handoff() -> (SampleSender, SampleReceiver) {
    let (tx, rx) = unbounded::<Sample>();
    (SampleSender { tx }, SampleReceiver { rx })
}

/// Producer side, cloned into each spawned worker
#[derive(Clone, Debug)]
pub struct SampleSender {
    tx: Sender<Sample>,
}

impl SampleSender {
    /// Non-blocking push. Fails only when the receiver has been dropped.
    pub fn push(&self, sample: Sample) -> Result<(), HandoffError> {
        let step = sample.step;
        self.tx
            .send(sample)
            .map_err(|_| HandoffError::Closed { step })
    }
}

/// Consumer side, owned by the controller
#[derive(Debug)]
pub struct SampleReceiver {
    rx: Receiver<Sample>,
}

impl SampleReceiver {
    /// Pop one sample if one is ready.
    ///
    /// An empty channel is the expected race with a concurrent push and
    /// simply yields `None`; the next drain picks the sample up.
    pub fn try_pop(&self) -> Option<Sample> {
        match self.rx.try_recv() {
            Ok(sample) => Some(sample),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::debug!("[HANDOFF] Channel disconnected, nothing left to pop");
                None
            }
        }
    }

    /// Pop until empty, appending in FIFO order. Returns the number moved.
    pub fn drain_into(&self, buffer: &mut Vec<Sample>) -> usize {
        let before = buffer.len();
        while let Some(sample) = self.try_pop() {
            buffer.push(sample);
        }
        buffer.len() - before
    }

    /// Pop until empty, dropping everything. Returns the number discarded.
    pub fn discard(&self) -> usize {
        let mut discarded = 0;
        while self.try_pop().is_some() {
            discarded += 1;
        }
        discarded
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
