//! Shared fixtures for the file-signature workspace tests.
//!
//! Provides deterministic input data, temporary input files and a reference
//! rendering of the expected signature output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Line terminator the generator writes after each checksum.
#[cfg(windows)]
pub const LINE_TERMINATOR: &str = "\r\n";
/// Line terminator the generator writes after each checksum.
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &str = "\n";

/// Returns `len` bytes of non-repeating-per-block data derived from `seed`.
///
/// Uses a xorshift sequence so that neighbouring blocks of any size differ.
#[must_use]
pub fn patterned_data(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

/// Writes `data` to `name` inside `dir` and returns the full path.
///
/// # Errors
///
/// Propagates any I/O error from writing the file.
pub fn write_input(dir: &Path, name: &str, data: &[u8]) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, data)?;
    Ok(path)
}

/// A temporary directory holding one input file.
pub struct InputFixture {
    dir: TempDir,
    input: PathBuf,
    data: Vec<u8>,
}

impl InputFixture {
    /// Creates a fixture with `len` bytes of patterned data.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from creating the directory or file.
    pub fn patterned(len: usize) -> io::Result<Self> {
        Self::with_data(patterned_data(len, len as u64))
    }

    /// Creates a fixture holding exactly `data`.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from creating the directory or file.
    pub fn with_data(data: Vec<u8>) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let input = write_input(dir.path(), "input.bin", &data)?;
        Ok(Self { dir, input, data })
    }

    /// Path of the input file.
    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Path of a not-yet-existing file named `name` in the fixture directory.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Bytes stored in the input file.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Signature the generator must produce for `block_size`.
    #[must_use]
    pub fn expected_signature(&self, block_size: usize) -> String {
        expected_signature(&self.data, block_size)
    }
}

/// Renders the signature of `data` block by block on the calling thread.
///
/// # Panics
///
/// Panics if `block_size` is zero.
#[must_use]
pub fn expected_signature(data: &[u8], block_size: usize) -> String {
    data.chunks(block_size)
        .map(|block| format!("{:x}{LINE_TERMINATOR}", checksums::crc32(block)))
        .collect()
}
