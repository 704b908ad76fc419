//! crates/signature/src/debug_hash.rs
//!
//! Structured tracing for signature runs.
//!
//! All tracing is conditionally compiled behind the `tracing` feature flag and
//! produces no-op inline functions when disabled.

use crate::generation::RunStage;
use crate::layout::BlockLayout;

/// Target name for run-level events.
#[cfg(feature = "tracing")]
const RUN_TARGET: &str = "signature::run";
/// Target name for per-block dispatch and reassembly events.
#[cfg(feature = "tracing")]
const BLOCK_TARGET: &str = "signature::block";

/// Traces entry into a run stage.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_stage(stage: RunStage) {
    tracing::debug!(target: RUN_TARGET, stage = stage.as_str(), "run: entering stage");
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_stage(_stage: RunStage) {}

/// Traces the block layout chosen for the input.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_layout(layout: &BlockLayout, workers: usize, window: usize) {
    tracing::debug!(
        target: RUN_TARGET,
        file_size = layout.file_size(),
        block_size = layout.block_size().get(),
        block_count = layout.block_count(),
        remainder = layout.remainder(),
        workers = workers,
        reorder_window = window,
        "run: layout probed"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_layout(_layout: &BlockLayout, _workers: usize, _window: usize) {}

/// Traces a block handed to a worker slot.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_dispatch(slot: usize, id: u64, len: usize) {
    tracing::trace!(target: BLOCK_TARGET, slot = slot, id = id, len = len, "block: dispatched");
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_dispatch(_slot: usize, _id: u64, _len: usize) {}

/// Traces a checksum submitted to the reorder buffer.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_submit(id: u64, checksum: u32, next_expected: u64, backlog: usize) {
    tracing::trace!(
        target: BLOCK_TARGET,
        id = id,
        checksum = format!("{checksum:08x}"),
        next_expected = next_expected,
        backlog = backlog,
        "block: submitted"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_submit(_id: u64, _checksum: u32, _next_expected: u64, _backlog: usize) {}

/// Traces a failure recorded by a worker.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_worker_failure(slot: usize, id: u64, message: &str) {
    tracing::warn!(target: BLOCK_TARGET, slot = slot, id = id, error = %message, "block: worker failed");
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_worker_failure(_slot: usize, _id: u64, _message: &str) {}

/// Traces the end of a run.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_finished(blocks: u64, bytes: u64, success: bool) {
    tracing::debug!(
        target: RUN_TARGET,
        blocks = blocks,
        bytes = bytes,
        success = success,
        "run: finished"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_finished(_blocks: u64, _bytes: u64, _success: bool) {}
