//! Logging for Scribe
//!
//! Installs the global `tracing` subscriber. Every crate logs through the
//! `tracing` macros; this is the only place that decides where records go.

use scribe_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize logging from configuration
///
/// `RUST_LOG`, when set and valid, takes precedence over the configured
/// filter. An invalid configured filter falls back to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &TelemetryConfig, debug: bool) -> anyhow::Result<()> {
    let filter = build_filter(config.filter(debug));
    let directives = filter.to_string();

    let result = match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
    tracing::debug!(filter = %directives, format = ?config.log_format, "logging initialized");

    Ok(())
}

fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_an_error() {
        let config = TelemetryConfig::default();

        init(&config, true).unwrap();
        let err = init(&config, false).unwrap_err();

        assert!(err.to_string().contains("failed to install log subscriber"));
    }
}
