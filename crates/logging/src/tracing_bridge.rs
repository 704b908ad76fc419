//! crates/logging/src/tracing_bridge.rs
//! Subscriber setup mapping the verbosity configuration onto `tracing`.
//!
//! Events are formatted by `tracing_subscriber::fmt` and written to standard
//! error so they never mix with signature output. The `RUST_LOG` environment
//! variable, when set and valid, replaces the directives derived from the
//! verbosity configuration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2))?;
//! tracing::debug!(target: "signature::run", "run: entering stage");
//! ```

use super::config::VerbosityConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::TryInitError;

/// Builds the filter for `config`, preferring a valid `RUST_LOG` value.
#[must_use]
pub fn build_filter(config: &VerbosityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()))
}

/// Installs the global subscriber writing to standard error.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: VerbosityConfig) -> Result<(), TryInitError> {
    init_tracing_with_writer(config, std::io::stderr)
}

/// Installs the global subscriber writing to `writer`.
pub fn init_tracing_with_writer<W>(config: VerbosityConfig, writer: W) -> Result<(), TryInitError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_names(true)
        .without_time();

    tracing_subscriber::registry()
        .with(build_filter(&config))
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(
        target: super::config::RUN_TARGET,
        directives = %config.directives(),
        "logging initialised"
    );
    Ok(())
}
