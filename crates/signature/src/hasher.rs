//! crates/signature/src/hasher.rs
//!
//! File-level entry point: opens the streams, runs the generator and keeps the
//! last error message for callers that only inspect a boolean result.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use checksums::{BlockChecksum, Crc32Algorithm};

use crate::config::HasherConfig;
use crate::debug_hash::{trace_finished, trace_stage};
use crate::error::HashError;
use crate::generation::{HashSummary, RunStage, hash_stream, hash_stream_sequential};

/// Signs one input file into one output file, block by block.
///
/// # Examples
///
/// ```no_run
/// use signature::{FileHasher, HasherConfig};
///
/// let mut hasher = FileHasher::new("input.bin", "input.sig", HasherConfig::default());
/// if !hasher.calculate_hash() {
///     eprintln!("{}", hasher.last_error());
/// }
/// ```
#[derive(Debug)]
pub struct FileHasher<C = Crc32Algorithm> {
    input: PathBuf,
    output: PathBuf,
    config: HasherConfig,
    checksum: C,
    sequential: bool,
    last_error: String,
}

impl FileHasher<Crc32Algorithm> {
    /// Creates a hasher using CRC-32 block checksums.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        config: HasherConfig,
    ) -> Self {
        Self::with_checksum(input, output, config, Crc32Algorithm)
    }
}

impl<C: BlockChecksum> FileHasher<C> {
    /// Creates a hasher using a caller-supplied block checksum.
    pub fn with_checksum(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        config: HasherConfig,
        checksum: C,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            config,
            checksum,
            sequential: false,
            last_error: String::new(),
        }
    }

    /// Hashes every block on the calling thread instead of the worker pool.
    #[must_use]
    pub fn sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    /// Input path.
    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Output path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Runs the signature and returns `true` on success.
    ///
    /// On failure the reason is available from [`last_error`](Self::last_error).
    pub fn calculate_hash(&mut self) -> bool {
        self.run().is_ok()
    }

    /// Message of the most recent failure, or an empty string.
    #[must_use]
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// Runs the signature, returning a summary or the error that stopped it.
    ///
    /// The input is opened before the output, so a missing input never
    /// truncates an existing output file. Once the output exists, a failed
    /// run leaves whatever lines were written before the failure.
    ///
    /// # Errors
    ///
    /// Any [`HashError`]; its message is also kept for
    /// [`last_error`](Self::last_error).
    pub fn run(&mut self) -> Result<HashSummary, HashError> {
        self.last_error.clear();
        trace_stage(RunStage::NotStarted);

        let result = self.execute();
        trace_stage(RunStage::Done);
        match &result {
            Ok(summary) => trace_finished(summary.blocks, summary.bytes, true),
            Err(error) => {
                trace_finished(0, 0, false);
                self.last_error = error.to_string();
            }
        }
        result
    }

    fn execute(&self) -> Result<HashSummary, HashError> {
        let input = File::open(&self.input).map_err(|source| HashError::OpenInput {
            path: self.input.clone(),
            source,
        })?;
        let output = File::create(&self.output).map_err(|source| HashError::OpenOutput {
            path: self.output.clone(),
            source,
        })?;
        trace_stage(RunStage::StreamsValidated);

        let writer = BufWriter::new(output);
        if self.sequential {
            hash_stream_sequential(input, writer, self.config.block_size, &self.checksum)
        } else {
            hash_stream(input, writer, self.config, &self.checksum)
        }
    }
}
