//! crates/signature/src/failure.rs
//!
//! Run-wide failure flag shared between the dispatcher and its workers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Records that a run must stop issuing work and report failure.
///
/// The flag is the reliable signal. The message is best effort: concurrent
/// failures race on it and the last writer wins.
#[derive(Debug, Default)]
pub struct FailureState {
    failed: AtomicBool,
    message: Mutex<Option<String>>,
}

impl FailureState {
    /// Creates a state with no failure recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the run as failed and stores `message`.
    pub fn record(&self, message: impl Into<String>) {
        let message = message.into();
        // A poisoned lock still holds a usable Option; keep the message.
        match self.message.lock() {
            Ok(mut slot) => *slot = Some(message),
            Err(poisoned) => *poisoned.into_inner() = Some(message),
        }
        self.failed.store(true, Ordering::Release);
    }

    /// Returns `true` once any failure has been recorded.
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Returns the most recently recorded message.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.message.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Clears the flag and message ahead of a new run.
    pub fn reset(&mut self) {
        *self.failed.get_mut() = false;
        match self.message.get_mut() {
            Ok(slot) => *slot = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}
