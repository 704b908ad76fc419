//! crates/signature/src/pool.rs
//!
//! Fixed-size pool of reusable worker slots.
//!
//! Each slot runs at most one scoped worker thread at a time. Free slots are
//! handed out as tokens over a channel: the pool starts with one token per
//! slot, and a worker returns its token only after its checksum has been
//! submitted to the reorder buffer. The dispatcher therefore blocks on the
//! channel instead of polling per-slot idle flags, and a slot's buffer is never
//! reused while its worker still needs it.

use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::thread::{self, Scope, ScopedJoinHandle};

use checksums::BlockChecksum;
use crossbeam_channel::{Receiver, Sender};

use crate::debug_hash::{trace_submit, trace_worker_failure};
use crate::error::HashError;
use crate::failure::FailureState;
use crate::reorder::ReorderBuffer;

/// Message a worker sends when it gives its slot back.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SlotSignal {
    /// The worker submitted its result; the slot may be reused.
    Idle(usize),
    /// The worker recorded a failure; the slot stays out of rotation.
    Failed(usize),
}

/// Shared state every worker borrows for the duration of a run.
pub(crate) struct WorkerContext<'a, C, W> {
    pub(crate) checksum: &'a C,
    pub(crate) output: &'a Mutex<ReorderBuffer<W>>,
    pub(crate) failure: &'a FailureState,
}

impl<C, W> Clone for WorkerContext<'_, C, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, W> Copy for WorkerContext<'_, C, W> {}

impl<C: BlockChecksum, W: Write> WorkerContext<'_, C, W> {
    /// Submits a finished checksum under the reorder lock.
    fn submit(&self, id: u64, checksum: u32) -> Result<(), String> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| "reorder buffer lock poisoned".to_owned())?;
        output
            .submit(id, checksum)
            .map_err(|error| HashError::Write(error).to_string())?;
        trace_submit(id, checksum, output.next_expected(), output.backlog_len());
        Ok(())
    }
}

/// Returns a slot token when dropped, flagging a failure unless the worker
/// released it explicitly. A panicking worker still wakes the dispatcher.
struct SlotRelease<'a> {
    slot: usize,
    sender: Sender<SlotSignal>,
    failure: &'a FailureState,
    released: bool,
}

impl SlotRelease<'_> {
    fn release(mut self, signal: SlotSignal) {
        self.released = true;
        // The dispatcher owns the receiver for the whole run.
        let _ = self.sender.send(signal);
    }
}

impl Drop for SlotRelease<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.failure
                .record(HashError::WorkerPanicked { slot: self.slot }.to_string());
            let _ = self.sender.send(SlotSignal::Failed(self.slot));
        }
    }
}

/// Body of one worker: hash the owned buffer, submit, then give the slot back.
fn run_worker<C, W>(
    context: WorkerContext<'_, C, W>,
    slot: usize,
    id: u64,
    buffer: Vec<u8>,
    sender: Sender<SlotSignal>,
) where
    C: BlockChecksum,
    W: Write,
{
    let release = SlotRelease {
        slot,
        sender,
        failure: context.failure,
        released: false,
    };

    let checksum = context.checksum.checksum(&buffer);
    drop(buffer);

    match context.submit(id, checksum) {
        Ok(()) => release.release(SlotSignal::Idle(slot)),
        Err(message) => {
            trace_worker_failure(slot, id, &message);
            context.failure.record(message);
            release.release(SlotSignal::Failed(slot));
        }
    }
}

/// The worker slots of one run, bound to a thread scope.
pub(crate) struct SlotPool<'scope, 'env: 'scope, C, W> {
    scope: &'scope Scope<'scope, 'env>,
    context: WorkerContext<'scope, C, W>,
    slots: Vec<Option<ScopedJoinHandle<'scope, ()>>>,
    sender: Sender<SlotSignal>,
    receiver: Receiver<SlotSignal>,
}

impl<'scope, 'env: 'scope, C, W> SlotPool<'scope, 'env, C, W>
where
    C: BlockChecksum,
    W: Write + Send,
{
    /// Creates `workers` idle slots.
    pub(crate) fn new(
        scope: &'scope Scope<'scope, 'env>,
        context: WorkerContext<'scope, C, W>,
        workers: NonZeroUsize,
    ) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(workers.get());
        for slot in 0..workers.get() {
            // Capacity equals the slot count, so seeding never blocks.
            let _ = sender.send(SlotSignal::Idle(slot));
        }
        Self {
            scope,
            context,
            slots: (0..workers.get()).map(|_| None).collect(),
            sender,
            receiver,
        }
    }

    /// Returns `true` once a worker has recorded a failure.
    pub(crate) fn failed(&self) -> bool {
        self.context.failure.is_failed()
    }

    /// Blocks until a slot is idle.
    ///
    /// Returns `None` once the run has failed; no further work may be issued.
    pub(crate) fn acquire(&mut self) -> Option<usize> {
        loop {
            if self.failed() {
                return None;
            }
            match self.receiver.recv() {
                Ok(SlotSignal::Idle(slot)) => return Some(slot),
                Ok(SlotSignal::Failed(_)) => {}
                Err(_) => return None,
            }
        }
    }

    /// Hands block `id` and its buffer to the idle slot `slot`.
    ///
    /// The slot's previous thread, if any, is joined before the new worker
    /// starts. It has already sent its token, so the join does not wait on
    /// hashing.
    pub(crate) fn dispatch(
        &mut self,
        slot: usize,
        id: u64,
        buffer: Vec<u8>,
    ) -> Result<(), HashError> {
        if let Some(previous) = self.slots[slot].take() {
            previous
                .join()
                .map_err(|_| HashError::WorkerPanicked { slot })?;
        }

        let context = self.context;
        let sender = self.sender.clone();
        let handle = thread::Builder::new()
            .name(format!("signature-slot-{slot}"))
            .spawn_scoped(self.scope, move || {
                run_worker(context, slot, id, buffer, sender);
            })
            .map_err(HashError::Spawn)?;
        self.slots[slot] = Some(handle);
        Ok(())
    }

    /// Joins every started worker, including after a failure.
    ///
    /// Returns the first panic observed, if any.
    pub(crate) fn drain(&mut self) -> Result<(), HashError> {
        let mut result = Ok(());
        for (slot, handle) in self.slots.iter_mut().enumerate() {
            let Some(handle) = handle.take() else {
                continue;
            };
            if handle.join().is_err() && result.is_ok() {
                result = Err(HashError::WorkerPanicked { slot });
            }
        }
        result
    }
}
