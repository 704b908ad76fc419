//! crates/signature/src/config.rs
//!
//! Run configuration for the block signature generator.

use std::num::NonZeroUsize;
use std::thread;

/// Block size used when the caller does not pick one (1 MiB).
pub const DEFAULT_BLOCK_SIZE: NonZeroUsize = match NonZeroUsize::new(1024 * 1024) {
    Some(size) => size,
    None => unreachable!(),
};

/// Configuration for a signature run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HasherConfig {
    /// Number of bytes in every block except possibly the last.
    pub block_size: NonZeroUsize,
    /// Number of worker slots in the pool.
    pub workers: NonZeroUsize,
    /// Reorder window `K`: the backlog length that triggers a sort and the
    /// number of backlog entries scanned per submission. `None` means twice
    /// the worker count.
    pub reorder_window: Option<NonZeroUsize>,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            workers: default_workers(),
            reorder_window: None,
        }
    }
}

impl HasherConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block size.
    #[must_use]
    pub fn with_block_size(mut self, size: NonZeroUsize) -> Self {
        self.block_size = size;
        self
    }

    /// Sets the number of worker slots.
    #[must_use]
    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    /// Overrides the reorder window.
    #[must_use]
    pub fn with_reorder_window(mut self, window: NonZeroUsize) -> Self {
        self.reorder_window = Some(window);
        self
    }

    /// Returns the effective reorder window.
    #[must_use]
    pub fn effective_reorder_window(&self) -> NonZeroUsize {
        const DOUBLE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(1);
        self.reorder_window
            .unwrap_or_else(|| self.workers.saturating_mul(DOUBLE))
    }
}

/// Worker count derived from the detected hardware concurrency, never below one.
#[must_use]
pub fn default_workers() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
