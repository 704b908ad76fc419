//! crates/signature/src/error.rs
//!
//! Errors raised while generating block signatures, plus the fallible block
//! allocation helpers that produce [`HashError::Allocation`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by a signature run.
///
/// The `Display` rendering of each variant is the message surfaced through
/// [`FileHasher::last_error`](crate::FileHasher::last_error).
#[derive(Debug, Error)]
pub enum HashError {
    /// The input file could not be opened for reading.
    #[error("Cannot open input file '{}': {source}", .path.display())]
    OpenInput {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The output file could not be created.
    #[error("Cannot open output file '{}': {source}", .path.display())]
    OpenOutput {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input holds no bytes, so there is nothing to sign.
    #[error("Input file is empty.")]
    EmptyInput,
    /// A block buffer of the requested size could not be allocated.
    #[error("Cannot allocate memory for a {requested}-byte block. Try to reduce the block size.")]
    Allocation {
        /// Number of bytes requested.
        requested: usize,
    },
    /// Reading a block from the input failed.
    #[error("failed to read input block: {0}")]
    Read(#[source] io::Error),
    /// Writing checksums to the output failed.
    #[error("failed to write signature output: {0}")]
    Write(#[source] io::Error),
    /// A worker thread could not be started.
    #[error("failed to start worker thread: {0}")]
    Spawn(#[source] io::Error),
    /// A worker recorded a failure while hashing or submitting its block.
    #[error("{0}")]
    Worker(String),
    /// A worker thread panicked before completing its block.
    #[error("worker in slot {slot} panicked")]
    WorkerPanicked {
        /// Slot index whose thread panicked.
        slot: usize,
    },
    /// Reassembly finished with blocks missing from the ordered output.
    #[error("results incomplete: expected block {expected}, found {}", .found.map_or_else(|| "nothing".to_owned(), |id| id.to_string()))]
    Incomplete {
        /// Next block id the output was waiting for.
        expected: u64,
        /// Smallest block id actually pending, if any.
        found: Option<u64>,
    },
}

/// Allocates a zero-filled buffer of `len` bytes without aborting on failure.
pub(crate) fn allocate_block(len: usize) -> Result<Vec<u8>, HashError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| HashError::Allocation { requested: len })?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Checks up front that a single block of `block_size` bytes can be allocated.
///
/// The probe reserves and immediately releases the memory, letting callers
/// reject an oversized block size before any file is opened.
pub fn probe_allocation(block_size: usize) -> Result<(), HashError> {
    let mut probe: Vec<u8> = Vec::new();
    probe
        .try_reserve_exact(block_size)
        .map_err(|_| HashError::Allocation {
            requested: block_size,
        })
}
