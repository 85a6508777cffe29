#![allow(clippy::must_use_candidate)]

pub mod cors;
pub mod database;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use database::*;
pub use health::*;
pub use loader::Format;
pub use server::*;
pub use telemetry::*;

/// Top-level Scribe configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// MySQL connection; the in-memory store is used when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
