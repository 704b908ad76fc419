//! crates/signature/src/generation.rs
//!
//! Stream-level signature generation: length probe, dispatch loop, drain and
//! final verification.

use std::io::{Read, Seek, SeekFrom, Write};
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::thread;

use checksums::BlockChecksum;

use crate::config::HasherConfig;
use crate::debug_hash::{trace_dispatch, trace_layout, trace_stage};
use crate::error::{HashError, allocate_block};
use crate::failure::FailureState;
use crate::layout::BlockLayout;
use crate::pool::{SlotPool, WorkerContext};
use crate::reorder::ReorderBuffer;

/// Stages a run moves through, strictly in declaration order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum RunStage {
    /// Nothing has been opened yet.
    NotStarted,
    /// Input and output streams are open.
    StreamsValidated,
    /// The input length is known and non-zero.
    LengthProbed,
    /// Blocks are being read and handed to workers.
    Dispatching,
    /// Every worker thread is being joined.
    Draining,
    /// The reorder backlog is being checked and flushed.
    Verifying,
    /// The run is over.
    Done,
}

impl RunStage {
    /// Short lowercase name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::StreamsValidated => "streams-validated",
            Self::LengthProbed => "length-probed",
            Self::Dispatching => "dispatching",
            Self::Draining => "draining",
            Self::Verifying => "verifying",
            Self::Done => "done",
        }
    }
}

/// What a successful run produced.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HashSummary {
    /// Number of checksum lines written.
    pub blocks: u64,
    /// Number of input bytes hashed.
    pub bytes: u64,
    /// Number of worker slots used.
    pub workers: usize,
}

/// Determines the stream length by seeking to the end and back to the start.
pub(crate) fn probe_length<R: Seek>(reader: &mut R) -> Result<u64, HashError> {
    let length = reader.seek(SeekFrom::End(0)).map_err(HashError::Read)?;
    reader.seek(SeekFrom::Start(0)).map_err(HashError::Read)?;
    Ok(length)
}

/// Generates the block signature of `reader` into `writer` using a worker pool.
///
/// One lowercase hexadecimal checksum is written per block, in block order,
/// however the workers happen to finish. On failure, lines already written
/// stay in `writer`; callers must treat that output as incomplete.
///
/// # Errors
///
/// - [`HashError::EmptyInput`] when the stream holds no bytes.
/// - [`HashError::Allocation`] when a block buffer cannot be allocated.
/// - [`HashError::Read`] when the stream cannot be probed or read.
/// - [`HashError::Worker`] when a worker failed to submit its result.
/// - [`HashError::Incomplete`] when reassembly ends with missing blocks.
pub fn hash_stream<R, W, C>(
    mut reader: R,
    writer: W,
    config: HasherConfig,
    checksum: &C,
) -> Result<HashSummary, HashError>
where
    R: Read + Seek,
    W: Write + Send,
    C: BlockChecksum,
{
    let length = probe_length(&mut reader)?;
    let layout = BlockLayout::new(length, config.block_size)?;
    trace_stage(RunStage::LengthProbed);

    let window = config.effective_reorder_window();
    trace_layout(&layout, config.workers.get(), window.get());

    let failure = FailureState::new();
    let output = Mutex::new(ReorderBuffer::new(writer, window));
    let context = WorkerContext {
        checksum,
        output: &output,
        failure: &failure,
    };

    let (dispatched, drained) = thread::scope(|scope| {
        let mut pool = SlotPool::new(scope, context, config.workers);
        trace_stage(RunStage::Dispatching);
        let dispatched = dispatch_blocks(&mut reader, layout, &mut pool);
        trace_stage(RunStage::Draining);
        let drained = pool.drain();
        (dispatched, drained)
    });

    let bytes = dispatched?;
    if failure.is_failed() {
        return Err(HashError::Worker(
            failure
                .message()
                .unwrap_or_else(|| "worker failed".to_owned()),
        ));
    }
    drained?;

    trace_stage(RunStage::Verifying);
    let mut output = output
        .into_inner()
        .map_err(|_| HashError::Worker("reorder buffer lock poisoned".to_owned()))?;
    output.finish(layout.block_count())?;

    Ok(HashSummary {
        blocks: output.written(),
        bytes,
        workers: config.workers.get(),
    })
}

/// Reads every block in order and hands each to an idle slot.
///
/// Stops early, without error, once a worker has failed; the caller reports
/// that failure after the pool has drained.
fn dispatch_blocks<R, C, W>(
    reader: &mut R,
    layout: BlockLayout,
    pool: &mut SlotPool<'_, '_, C, W>,
) -> Result<u64, HashError>
where
    R: Read,
    C: BlockChecksum,
    W: Write + Send,
{
    let mut bytes = 0u64;
    for span in layout.blocks() {
        if pool.failed() {
            break;
        }

        let mut buffer = allocate_block(span.len)?;
        reader.read_exact(&mut buffer).map_err(HashError::Read)?;

        let Some(slot) = pool.acquire() else {
            break;
        };
        trace_dispatch(slot, span.id, span.len);
        pool.dispatch(slot, span.id, buffer)?;
        bytes += span.len as u64;
    }
    Ok(bytes)
}

/// Single-threaded reference: reads and hashes each block in order on the
/// calling thread, reusing one buffer.
///
/// Produces byte-identical output to [`hash_stream`] for the same input,
/// block size and checksum.
pub fn hash_stream_sequential<R, W, C>(
    mut reader: R,
    writer: W,
    block_size: NonZeroUsize,
    checksum: &C,
) -> Result<HashSummary, HashError>
where
    R: Read + Seek,
    W: Write,
    C: BlockChecksum,
{
    let length = probe_length(&mut reader)?;
    let layout = BlockLayout::new(length, block_size)?;
    trace_stage(RunStage::LengthProbed);
    trace_layout(&layout, 1, 1);

    let largest = layout.block_len(0).unwrap_or(0);
    let mut buffer = allocate_block(largest)?;
    let mut output = ReorderBuffer::new(writer, NonZeroUsize::MIN);
    let mut bytes = 0u64;

    trace_stage(RunStage::Dispatching);
    for span in layout.blocks() {
        let chunk = &mut buffer[..span.len];
        reader.read_exact(chunk).map_err(HashError::Read)?;
        output
            .submit(span.id, checksum.checksum(chunk))
            .map_err(HashError::Write)?;
        bytes += span.len as u64;
    }

    trace_stage(RunStage::Verifying);
    output.finish(layout.block_count())?;

    Ok(HashSummary {
        blocks: output.written(),
        bytes,
        workers: 1,
    })
}
