//! Tracing subscriber setup.

use anyhow::{Result, anyhow};
use doorward_core::{LogFormat, LoggingConfig, constants::ENV_LOG_FILTER};
use tracing_subscriber::EnvFilter;

/// Pick the filter directive: `DOORWARD_LOG`, then `RUST_LOG`, then the
/// configured level.
pub fn filter_directive(
    doorward_log: Option<String>,
    rust_log: Option<String>,
    configured: &str,
) -> String {
    non_empty(doorward_log)
        .or_else(|| non_empty(rust_log))
        .unwrap_or_else(|| configured.to_string())
}

fn non_empty(directive: Option<String>) -> Option<String> {
    directive.filter(|d| !d.trim().is_empty())
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let directive = filter_directive(
        std::env::var(ENV_LOG_FILTER).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        &config.level,
    );
    EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("invalid log directive {directive:?} ({err}); defaulting to info");
        EnvFilter::new("info")
    })
}

/// Install the global `fmt` subscriber.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_target(false);

    let installed = match config.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
