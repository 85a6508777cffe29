use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

/// Request timeout applied when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Verbose logging unless the telemetry filter says otherwise
    #[serde(default)]
    pub debug: bool,
    /// Per-request deadline in seconds, `0` selects the default
    #[serde(default)]
    pub request_timeout: u64,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Effective per-request deadline
    pub const fn request_timeout(&self) -> Duration {
        if self.request_timeout == 0 {
            DEFAULT_REQUEST_TIMEOUT
        } else {
            Duration::from_secs(self.request_timeout)
        }
    }
}
