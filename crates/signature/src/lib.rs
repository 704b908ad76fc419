#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `signature` splits an input into fixed-size blocks, hashes each block on a
//! bounded pool of worker threads and writes one lowercase hexadecimal checksum
//! per line, in block order, to the output.
//!
//! # Design
//!
//! - [`BlockLayout`] derives the block count and tail length from the input
//!   size.
//! - A fixed set of worker slots is reused for the whole run. The dispatcher
//!   reads the next block and then waits for an idle slot to hand it to, so at
//!   most one buffer per slot plus the one being filled is live.
//! - [`ReorderBuffer`] serializes completed checksums into ascending block id
//!   order behind a single lock.
//! - [`FailureState`] stops dispatch as soon as any worker fails.
//!
//! # Examples
//!
//! ```
//! use std::io::Cursor;
//! use std::num::NonZeroUsize;
//!
//! use checksums::Crc32Algorithm;
//! use signature::{HasherConfig, hash_stream};
//!
//! let config = HasherConfig::new()
//!     .with_block_size(NonZeroUsize::new(4).unwrap())
//!     .with_workers(NonZeroUsize::new(2).unwrap());
//! let mut output = Vec::new();
//! let summary = hash_stream(Cursor::new(b"123456789"), &mut output, config, &Crc32Algorithm)?;
//!
//! assert_eq!(summary.blocks, 3);
//! assert_eq!(String::from_utf8(output).unwrap().lines().count(), 3);
//! # Ok::<(), signature::HashError>(())
//! ```
//!
//! # Features
//!
//! - `tracing`: emits run stages, block dispatch and reassembly events through
//!   the `tracing` crate.

mod config;
mod debug_hash;
mod error;
mod failure;
mod generation;
mod hasher;
mod layout;
mod pool;
mod reorder;

pub use config::{DEFAULT_BLOCK_SIZE, HasherConfig, default_workers};
pub use error::{HashError, probe_allocation};
pub use failure::FailureState;
pub use generation::{HashSummary, RunStage, hash_stream, hash_stream_sequential};
pub use hasher::FileHasher;
pub use layout::{BlockLayout, BlockSpan};
pub use reorder::{LINE_TERMINATOR, PendingResult, ReorderBuffer};
