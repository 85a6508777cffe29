use serde::Deserialize;

/// Logging configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// `tracing` filter directive, e.g. `info` or `scribe_server=debug`
    #[serde(default)]
    pub log_filter: Option<String>,
    /// Output format for log records
    #[serde(default)]
    pub log_format: LogFormat,
}

impl TelemetryConfig {
    /// Filter directive to install, honouring the server debug flag
    pub fn filter(&self, debug: bool) -> &str {
        match self.log_filter.as_deref() {
            Some(filter) => filter,
            None if debug => "debug",
            None => "info",
        }
    }
}

/// Log record format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable multi-field lines
    Pretty,
}
