//! crates/checksums/src/crc32.rs
//!
//! CRC-32 (IEEE 802.3) computed with a half-byte lookup table.
//!
//! The table holds the sixteen remainders of every 4-bit value, so each input
//! byte costs two lookups. This trades some throughput against the classic
//! 256-entry table for a table that fits in a single cache line, which keeps
//! many concurrent workers from competing for L1 space.

/// Reflected form of the IEEE 802.3 polynomial `0x04C11DB7`.
pub const POLYNOMIAL: u32 = 0xEDB8_8320;

const INITIAL: u32 = 0xFFFF_FFFF;

/// Remainders for every half-byte value under [`POLYNOMIAL`].
const NIBBLE_TABLE: [u32; 16] = build_nibble_table();

const fn build_nibble_table() -> [u32; 16] {
    let mut table = [0u32; 16];
    let mut index = 0;
    while index < 16 {
        let mut crc = index as u32;
        let mut bit = 0;
        while bit < 4 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[index] = crc;
        index += 1;
    }
    table
}

/// Streaming CRC-32 state.
///
/// # Examples
///
/// ```
/// use checksums::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"1234");
/// crc.update(b"56789");
/// assert_eq!(crc.value(), 0xCBF4_3926);
/// ```
#[doc(alias = "crc32")]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Crc32 {
    state: u32,
    len: u64,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    /// Creates a checksum that has observed no bytes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: INITIAL,
            len: 0,
        }
    }

    /// Feeds `data` into the checksum.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        let mut crc = self.state;
        for &byte in data {
            crc ^= u32::from(byte);
            crc = (crc >> 4) ^ NIBBLE_TABLE[(crc & 0x0F) as usize];
            crc = (crc >> 4) ^ NIBBLE_TABLE[(crc & 0x0F) as usize];
        }
        self.state = crc;
        self.len = self.len.wrapping_add(data.len() as u64);
    }

    /// Returns the checksum of every byte observed so far.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.state ^ INITIAL
    }

    /// Number of bytes observed since construction or the last reset.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` when no bytes have been observed.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resets the checksum back to its initial state.
    pub const fn reset(&mut self) {
        self.state = INITIAL;
        self.len = 0;
    }
}

/// One-shot CRC-32 of `data`.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.value()
}
