//! crates/logging/src/config.rs
//! Verbosity configuration combining the run-level and block-level thresholds.

use super::levels::LogLevel;

/// Target prefix for run-level events (stages, layout, summary).
pub const RUN_TARGET: &str = "signature::run";
/// Target prefix for per-block events (dispatch, reassembly, worker failures).
pub const BLOCK_TARGET: &str = "signature::block";

/// Thresholds applied to each diagnostic target.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VerbosityConfig {
    /// Threshold for everything without a more specific entry.
    pub base: LogLevel,
    /// Threshold for run-level events.
    pub run: LogLevel,
    /// Threshold for per-block events.
    pub block: LogLevel,
}

impl VerbosityConfig {
    /// Creates a configuration from the number of `-v` flags given.
    ///
    /// | level | base  | run   | block |
    /// |-------|-------|-------|-------|
    /// | 0     | warn  | warn  | warn  |
    /// | 1     | warn  | info  | warn  |
    /// | 2     | info  | debug | warn  |
    /// | 3     | info  | debug | trace |
    /// | 4+    | trace | trace | trace |
    #[must_use]
    pub const fn from_verbose_level(level: u8) -> Self {
        let (base, run, block) = match level {
            0 => (LogLevel::Warn, LogLevel::Warn, LogLevel::Warn),
            1 => (LogLevel::Warn, LogLevel::Info, LogLevel::Warn),
            2 => (LogLevel::Info, LogLevel::Debug, LogLevel::Warn),
            3 => (LogLevel::Info, LogLevel::Debug, LogLevel::Trace),
            _ => (LogLevel::Trace, LogLevel::Trace, LogLevel::Trace),
        };
        Self { base, run, block }
    }

    /// Renders the configuration as `EnvFilter` directives.
    #[must_use]
    pub fn directives(&self) -> String {
        format!(
            "{},{RUN_TARGET}={},{BLOCK_TARGET}={}",
            self.base, self.run, self.block
        )
    }

    /// Most verbose threshold across all targets.
    #[must_use]
    pub fn max_level(&self) -> LogLevel {
        self.base.max(self.run).max(self.block)
    }
}
