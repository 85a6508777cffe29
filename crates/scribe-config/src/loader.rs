use std::path::Path;

use http::{HeaderName, Method};

use crate::Config;

/// Prefix owned by the article routes
const ARTICLES_PATH: &str = "/api/v1/articles";

/// On-disk configuration syntax, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
}

impl Format {
    /// `.yaml` and `.yml` are YAML, everything else is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

impl Config {
    /// Load configuration from a TOML or YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsing fails, or
    /// validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::parse(&raw, Format::from_path(path))?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration text without validating it
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid for `format` or contains
    /// unknown keys
    pub fn parse(raw: &str, format: Format) -> anyhow::Result<Self> {
        match format {
            Format::Toml => toml::from_str(raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}")),
            Format::Yaml => serde_yaml::from_str(raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}")),
        }
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_health()?;
        self.validate_cors()?;
        self.validate_database()?;
        Ok(())
    }

    fn validate_health(&self) -> anyhow::Result<()> {
        let health = &self.server.health;

        if !health.enabled {
            return Ok(());
        }

        if !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/': {}", health.path);
        }

        if health.path.contains(['{', '}']) {
            anyhow::bail!("server.health.path must not contain route parameters: {}", health.path);
        }

        let path = health.path.trim_end_matches('/');
        if path == ARTICLES_PATH || path.starts_with(&format!("{ARTICLES_PATH}/")) {
            anyhow::bail!("server.health.path overlaps the article routes: {}", health.path);
        }

        Ok(())
    }

    fn validate_cors(&self) -> anyhow::Result<()> {
        let cors = &self.server.cors;

        for method in cors.methods.entries() {
            Method::from_bytes(method.as_bytes())
                .map_err(|e| anyhow::anyhow!("invalid CORS method '{method}': {e}"))?;
        }

        for header in cors.headers.entries().iter().chain(&cors.expose_headers) {
            HeaderName::from_bytes(header.as_bytes())
                .map_err(|e| anyhow::anyhow!("invalid CORS header '{header}': {e}"))?;
        }

        Ok(())
    }

    fn validate_database(&self) -> anyhow::Result<()> {
        let Some(ref database) = self.database else {
            return Ok(());
        };

        for (key, value) in [("host", &database.host), ("user", &database.user), ("name", &database.name)] {
            if value.trim().is_empty() {
                anyhow::bail!("database.{key} must not be empty");
            }
        }

        if database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be greater than 0");
        }

        Ok(())
    }
}
