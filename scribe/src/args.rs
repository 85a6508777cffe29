use std::path::PathBuf;

use clap::Parser;

/// Scribe article service
#[derive(Debug, Parser)]
#[command(name = "scribe", about = "Article CRUD service with structured error dispatch")]
pub struct Args {
    /// Path to configuration file (TOML, or YAML for .yaml/.yml)
    #[arg(short, long, default_value = "scribe.toml", env = "SCRIBE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "SCRIBE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["scribe"]).unwrap();
        assert_eq!(args.config, PathBuf::from("scribe.toml"));
        assert!(args.listen.is_none());
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from(["scribe", "-c", "conf/prod.yaml", "--listen", "127.0.0.1:8080"]).unwrap();
        assert_eq!(args.config, PathBuf::from("conf/prod.yaml"));
        assert_eq!(args.listen, Some("127.0.0.1:8080".parse().unwrap()));
    }
}
