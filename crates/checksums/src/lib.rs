#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `checksums` provides the block checksum used by the file-signature
//! generator: a CRC-32 (IEEE 802.3) computed with a half-byte lookup table,
//! together with the [`BlockChecksum`] trait the generator is written against.
//!
//! # Examples
//!
//! ```
//! use checksums::{BlockChecksum, Crc32Algorithm, crc32};
//!
//! assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
//! assert_eq!(Crc32Algorithm.checksum(b"123456789"), 0xCBF4_3926);
//! ```

mod block;
mod crc32;

pub use block::{BlockChecksum, Crc32Algorithm};
pub use crc32::{Crc32, POLYNOMIAL, crc32};
