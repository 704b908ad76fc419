//! crates/checksums/src/block.rs
//!
//! The per-block checksum seam used by the signature generator.

use crate::crc32::crc32;

/// Deterministic function from a block of bytes to a 32-bit checksum.
///
/// Implementations are shared by reference between worker threads, so they
/// must be `Send + Sync` and must not depend on call order.
pub trait BlockChecksum: Send + Sync {
    /// Computes the checksum of `block`.
    fn checksum(&self, block: &[u8]) -> u32;
}

/// The default block checksum: CRC-32 via the half-byte table.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Crc32Algorithm;

impl BlockChecksum for Crc32Algorithm {
    #[inline]
    fn checksum(&self, block: &[u8]) -> u32 {
        crc32(block)
    }
}

impl<F> BlockChecksum for F
where
    F: Fn(&[u8]) -> u32 + Send + Sync,
{
    #[inline]
    fn checksum(&self, block: &[u8]) -> u32 {
        self(block)
    }
}
