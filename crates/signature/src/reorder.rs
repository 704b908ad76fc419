//! crates/signature/src/reorder.rs
//!
//! Ordered reassembly of block checksums that complete out of order.
//!
//! Workers finish in whatever order the scheduler allows, but the output must
//! list one checksum per block in ascending block id. [`ReorderBuffer`] writes a
//! result straight through when it is the next id the output is waiting for and
//! parks everything else in a backlog.
//!
//! # Backlog policy
//!
//! Each out-of-order submission appends to the backlog, sorts the backlog once
//! it grows past the reorder window `K`, and then scans at most `K` entries from
//! the front, writing every entry that matches the advancing expected id. A
//! ready entry deeper than the window is not lost: a later submission or the
//! final [`finish`](ReorderBuffer::finish) drain picks it up. Under adversarial
//! completion orders the backlog can therefore grow past `K` before it drains.

use std::io::{self, Write};
use std::mem;
use std::num::NonZeroUsize;

use crate::error::HashError;

/// Line terminator appended after every checksum.
#[cfg(windows)]
pub const LINE_TERMINATOR: &str = "\r\n";
/// Line terminator appended after every checksum.
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &str = "\n";

/// A completed checksum waiting for earlier blocks to be written.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PendingResult {
    /// Block id the checksum belongs to.
    pub id: u64,
    /// Checksum of the block.
    pub checksum: u32,
}

/// Serializes `(id, checksum)` pairs into strictly ascending id order.
///
/// The buffer itself is not synchronized; the pool wraps it in a single mutex
/// so that only one thread writes to the sink or touches the expected id at a
/// time.
#[derive(Debug)]
pub struct ReorderBuffer<W> {
    sink: W,
    next_expected: u64,
    backlog: Vec<PendingResult>,
    window: usize,
}

impl<W: Write> ReorderBuffer<W> {
    /// Creates a buffer writing to `sink` with reorder window `window`.
    pub fn new(sink: W, window: NonZeroUsize) -> Self {
        Self {
            sink,
            next_expected: 0,
            backlog: Vec::with_capacity(window.get() + 1),
            window: window.get(),
        }
    }

    /// Accepts the checksum for block `id`.
    ///
    /// Errors come only from the underlying sink.
    pub fn submit(&mut self, id: u64, checksum: u32) -> io::Result<()> {
        if id == self.next_expected {
            return self.emit(checksum);
        }

        self.backlog.push(PendingResult { id, checksum });
        if self.backlog.len() > self.window {
            self.backlog.sort_unstable_by_key(|pending| pending.id);
        }

        let mut index = 0;
        let mut scanned = 0;
        while index < self.backlog.len() && scanned < self.window {
            scanned += 1;
            if self.backlog[index].id == self.next_expected {
                let pending = self.backlog.remove(index);
                self.emit(pending.checksum)?;
            } else {
                index += 1;
            }
        }
        Ok(())
    }

    /// Writes the remaining backlog and flushes the sink.
    ///
    /// The backlog must be exactly the contiguous run of ids starting at the
    /// next expected id, and the output must end up holding `block_count`
    /// lines. Otherwise nothing more is written and
    /// [`HashError::Incomplete`] is returned.
    pub fn finish(&mut self, block_count: u64) -> Result<(), HashError> {
        if !self.backlog.is_empty() {
            self.backlog.sort_unstable_by_key(|pending| pending.id);
            for (offset, pending) in self.backlog.iter().enumerate() {
                let expected = self.next_expected + offset as u64;
                if pending.id != expected {
                    return Err(HashError::Incomplete {
                        expected,
                        found: Some(pending.id),
                    });
                }
            }
            for pending in mem::take(&mut self.backlog) {
                self.emit(pending.checksum).map_err(HashError::Write)?;
            }
        }

        if self.next_expected != block_count {
            return Err(HashError::Incomplete {
                expected: self.next_expected,
                found: None,
            });
        }

        self.sink.flush().map_err(HashError::Write)
    }

    fn emit(&mut self, checksum: u32) -> io::Result<()> {
        write!(self.sink, "{checksum:x}{LINE_TERMINATOR}")?;
        self.next_expected += 1;
        Ok(())
    }
}

impl<W> ReorderBuffer<W> {
    /// Smallest block id not yet written; equals the number of lines written.
    #[inline]
    #[must_use]
    pub const fn next_expected(&self) -> u64 {
        self.next_expected
    }

    /// Number of lines written so far; an alias of
    /// [`next_expected`](Self::next_expected).
    #[inline]
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.next_expected
    }

    /// Number of completed results still waiting for earlier ids.
    #[inline]
    #[must_use]
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Returns the sink, discarding any unwritten backlog.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window(size: usize) -> NonZeroUsize {
        NonZeroUsize::new(size).expect("non-zero window")
    }

    fn lines(buffer: ReorderBuffer<Vec<u8>>) -> Vec<String> {
        String::from_utf8(buffer.into_inner())
            .expect("hex output is ASCII")
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn in_order_submissions_write_through() {
        let mut buffer = ReorderBuffer::new(Vec::new(), window(4));
        buffer.submit(0, 0xAB).expect("write");
        buffer.submit(1, 0x1234_5678).expect("write");
        assert_eq!(buffer.backlog_len(), 0);
        assert_eq!(buffer.next_expected(), 2);
        buffer.finish(2).expect("finish");
        assert_eq!(buffer.written(), buffer.next_expected());
        assert_eq!(buffer.written(), 2);
        assert_eq!(lines(buffer), vec!["ab", "12345678"]);
    }

    #[test]
    fn output_is_lowercase_unpadded_hex() {
        let mut buffer = ReorderBuffer::new(Vec::new(), window(1));
        buffer.submit(0, 0x0000_000F).expect("write");
        buffer.submit(1, 0xDEAD_BEEF).expect("write");
        buffer.finish(2).expect("finish");
        let text = String::from_utf8(buffer.into_inner()).expect("ascii");
        assert_eq!(text, format!("f{LINE_TERMINATOR}deadbeef{LINE_TERMINATOR}"));
    }

    #[test]
    fn out_of_order_result_waits_for_predecessor() {
        let mut buffer = ReorderBuffer::new(Vec::new(), window(4));
        buffer.submit(1, 0x11).expect("park");
        assert_eq!(buffer.backlog_len(), 1);
        assert_eq!(buffer.next_expected(), 0);

        buffer.submit(0, 0x10).expect("write");
        // The in-order fast path returns without rescanning the backlog.
        assert_eq!(buffer.next_expected(), 1);
        assert_eq!(buffer.backlog_len(), 1);

        buffer.submit(2, 0x12).expect("scan");
        assert_eq!(buffer.next_expected(), 3);
        assert_eq!(buffer.backlog_len(), 0);
        buffer.finish(3).expect("finish");
        assert_eq!(lines(buffer), vec!["10", "11", "12"]);
    }

    #[test]
    fn scan_continues_past_each_match() {
        let mut buffer = ReorderBuffer::new(Vec::new(), window(8));
        buffer.submit(1, 1).expect("park");
        buffer.submit(2, 2).expect("park");
        buffer.submit(3, 3).expect("park");
        buffer.submit(0, 0).expect("write");
        buffer.submit(5, 5).expect("scan");
        // 1, 2 and 3 drain in a single pass; 5 still waits for 4.
        assert_eq!(buffer.next_expected(), 4);
        assert_eq!(buffer.backlog_len(), 1);
    }

    #[test]
    fn ready_entry_beyond_window_is_deferred_not_lost() {
        let mut buffer = ReorderBuffer::new(Vec::new(), window(1));
        buffer.submit(2, 2).expect("park");
        buffer.submit(1, 1).expect("park and sort");
        buffer.submit(0, 0).expect("write");
        buffer.submit(4, 4).expect("scan one entry");
        // Only one entry is inspected: 1 drains, 2 stays behind although ready.
        assert_eq!(buffer.next_expected(), 2);
        assert_eq!(buffer.backlog_len(), 2);

        buffer.submit(3, 3).expect("scan one entry");
        assert_eq!(buffer.next_expected(), 3);

        buffer.finish(5).expect("final drain writes the rest");
        assert_eq!(lines(buffer), vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn finish_rejects_gap_before_backlog() {
        let mut buffer = ReorderBuffer::new(Vec::new(), window(2));
        buffer.submit(0, 0).expect("write");
        buffer.submit(2, 2).expect("park");
        let error = buffer.finish(3).expect_err("block 1 never arrived");
        assert!(matches!(
            error,
            HashError::Incomplete {
                expected: 1,
                found: Some(2)
            }
        ));
        // Nothing past the gap reaches the sink.
        assert_eq!(lines(buffer), vec!["0"]);
    }

    #[test]
    fn finish_rejects_gap_inside_backlog() {
        let mut buffer = ReorderBuffer::new(Vec::new(), window(1));
        buffer.submit(2, 2).expect("park");
        buffer.submit(4, 4).expect("park");
        buffer.submit(0, 0).expect("write");
        buffer.submit(1, 1).expect("write");
        let error = buffer.finish(5).expect_err("block 3 never arrived");
        assert!(matches!(
            error,
            HashError::Incomplete {
                expected: 3,
                found: Some(4)
            }
        ));
    }

    #[test]
    fn finish_rejects_missing_tail() {
        let mut buffer = ReorderBuffer::new(Vec::new(), window(2));
        buffer.submit(0, 0).expect("write");
        let error = buffer.finish(2).expect_err("block 1 missing");
        assert!(matches!(
            error,
            HashError::Incomplete {
                expected: 1,
                found: None
            }
        ));
    }

    #[test]
    fn sink_errors_propagate() {
        struct BrokenSink;
        impl Write for BrokenSink {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("sink closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut buffer = ReorderBuffer::new(BrokenSink, window(2));
        let error = buffer.submit(0, 1).expect_err("sink rejects writes");
        assert_eq!(error.to_string(), "sink closed");
        assert_eq!(buffer.next_expected(), 0);
    }

    proptest! {
        #[test]
        fn any_completion_order_yields_ascending_output(
            order in Just((0..64u64).collect::<Vec<_>>()).prop_shuffle(),
            window_size in 1usize..16,
        ) {
            let mut buffer = ReorderBuffer::new(Vec::new(), window(window_size));
            for &id in &order {
                buffer.submit(id, (id as u32).wrapping_mul(0x9E37_79B9)).expect("write");
            }
            buffer.finish(order.len() as u64).expect("finish");

            let expected: Vec<String> = (0..64u64)
                .map(|id| format!("{:x}", (id as u32).wrapping_mul(0x9E37_79B9)))
                .collect();
            prop_assert_eq!(lines(buffer), expected);
        }
    }
}
