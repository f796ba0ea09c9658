use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Logs go to stderr; stdout carries command
/// output only.
///
/// Filter precedence: `RUST_LOG`, then `-v` flags, then `logging.level`.
///
/// # Errors
/// Returns an error if the filter directive is invalid or a subscriber is
/// already installed.
pub fn init(cfg: &LoggingConfig, verbose: u8) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive(&cfg.level, verbose))
            .with_context(|| format!("invalid logging.level: {}", cfg.level))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    match cfg.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true),
            )
            .try_init(),
    }
    .context("failed to install tracing subscriber")
}

fn directive(level: &str, verbose: u8) -> &str {
    match verbose {
        0 => level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
