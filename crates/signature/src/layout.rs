//! crates/signature/src/layout.rs
//!
//! Division of an input into fixed-size blocks plus an optional tail.

use std::num::NonZeroUsize;

use crate::error::HashError;

/// Describes how an input of a given length splits into blocks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockLayout {
    file_size: u64,
    block_size: NonZeroUsize,
    full_blocks: u64,
    remainder: u64,
}

impl BlockLayout {
    /// Computes the layout for `file_size` bytes split into `block_size` blocks.
    ///
    /// Empty inputs are rejected with [`HashError::EmptyInput`].
    pub fn new(file_size: u64, block_size: NonZeroUsize) -> Result<Self, HashError> {
        if file_size == 0 {
            return Err(HashError::EmptyInput);
        }
        let block = block_size.get() as u64;
        Ok(Self {
            file_size,
            block_size,
            full_blocks: file_size / block,
            remainder: file_size % block,
        })
    }

    /// Total number of input bytes.
    #[inline]
    #[must_use]
    pub const fn file_size(self) -> u64 {
        self.file_size
    }

    /// Length of every block except possibly the last.
    #[inline]
    #[must_use]
    pub const fn block_size(self) -> NonZeroUsize {
        self.block_size
    }

    /// Number of blocks holding exactly [`block_size`](Self::block_size) bytes.
    #[inline]
    #[must_use]
    pub const fn full_blocks(self) -> u64 {
        self.full_blocks
    }

    /// Byte count of the trailing partial block, zero when the length divides evenly.
    #[inline]
    #[must_use]
    pub const fn remainder(self) -> u64 {
        self.remainder
    }

    /// Total number of blocks, `ceil(file_size / block_size)`.
    #[inline]
    #[must_use]
    pub const fn block_count(self) -> u64 {
        if self.remainder == 0 {
            self.full_blocks
        } else {
            self.full_blocks + 1
        }
    }

    /// Byte length of block `id`, or `None` past the end of the input.
    #[must_use]
    pub fn block_len(self, id: u64) -> Option<usize> {
        if id < self.full_blocks {
            Some(self.block_size.get())
        } else if id == self.full_blocks && self.remainder != 0 {
            // remainder < block_size, which is a usize.
            Some(self.remainder as usize)
        } else {
            None
        }
    }

    /// Iterates `(id, len)` pairs in read order.
    pub fn blocks(self) -> impl Iterator<Item = BlockSpan> {
        (0..self.block_count()).filter_map(move |id| {
            self.block_len(id).map(|len| BlockSpan { id, len })
        })
    }
}

/// One block of the input: its id and byte length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockSpan {
    /// Zero-based block id, assigned in read order.
    pub id: u64,
    /// Number of bytes in the block.
    pub len: usize,
}
