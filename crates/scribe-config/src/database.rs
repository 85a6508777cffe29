use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// MySQL connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub name: String,
    /// Upper bound on pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout: u64,
}

impl DatabaseConfig {
    pub const fn acquire_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout)
    }
}

const fn default_port() -> u16 {
    3306
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_acquire_timeout() -> u64 {
    5
}
