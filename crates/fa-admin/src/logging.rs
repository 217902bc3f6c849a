//! Tracing subscriber setup

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Filter for the session: `RUST_LOG` wins, then `-v`, then the config level
///
/// # Errors
///
/// Returns the parse error for an invalid directive.
pub fn filter(config: &LoggingConfig, verbose: bool) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = if verbose { "debug" } else { config.level.as_str() };
    Ok(EnvFilter::try_new(level)?)
}

/// Install the global subscriber, writing to stderr
///
/// # Errors
///
/// Invalid filter directives or a subscriber already installed.
pub fn init(config: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
    let filter = filter(config, verbose)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match config.format {
        LogFormat::Text => builder
            .without_time()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?,
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?,
    }
    Ok(())
}
