//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use scribe_config::{AllowList, Config, CorsConfig, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Restrict CORS to the given origins
    pub fn with_cors_origins(mut self, origins: &[&str]) -> Self {
        self.config.server.cors = CorsConfig {
            origins: AllowList::Only(origins.iter().map(|o| (*o).to_owned()).collect()),
            ..CorsConfig::default()
        };
        self
    }

    /// Turn the CORS layer off
    pub fn without_cors(mut self) -> Self {
        self.config.server.cors.enabled = false;
        self
    }

    /// Set the request timeout in seconds
    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.config.server.request_timeout = seconds;
        self
    }

    /// Serve the health check on another path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
