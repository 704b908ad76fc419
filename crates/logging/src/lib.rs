#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` turns the command line's `-v` count into per-target severity
//! thresholds and, with the `tracing` feature, installs a `tracing`
//! subscriber that applies them.
//!
//! # Design
//!
//! - [`LogLevel`] is a plain severity threshold, independent of any logging
//!   backend.
//! - [`VerbosityConfig`] assigns a threshold to run-level and block-level
//!   events separately, so `-vv` shows stage transitions without flooding the
//!   terminal with one line per block.
//! - `init_tracing` renders the configuration as `EnvFilter` directives. A
//!   valid `RUST_LOG` overrides them.
//!
//! # Examples
//!
//! ```
//! use logging::{LogLevel, VerbosityConfig};
//!
//! let config = VerbosityConfig::from_verbose_level(1);
//! assert_eq!(config.run, LogLevel::Info);
//! assert_eq!(config.block, LogLevel::Warn);
//! ```

mod config;
mod levels;

#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
mod tracing_bridge;

pub use config::{BLOCK_TARGET, RUN_TARGET, VerbosityConfig};
pub use levels::LogLevel;

#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
pub use tracing_bridge::{build_filter, init_tracing, init_tracing_with_writer};
