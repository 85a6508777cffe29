//! Article resource: domain model, persistence and use cases

use std::sync::Arc;

use scribe_config::DatabaseConfig;

pub mod cursor;
mod domain;
mod error;
pub mod memory;
pub mod mysql;
mod repository;
mod service;

pub use domain::{Article, Author, Violations};
pub use error::{ArticleError, Result};
pub use repository::{ArticleRepository, AuthorRepository};
pub use service::{ArticleService, Service};

/// Build the article service for the configured store
///
/// Connects to MySQL when a database is configured, otherwise falls back to
/// the in-memory store.
///
/// # Errors
///
/// Returns an error if the database cannot be reached
pub async fn build_service(database: Option<&DatabaseConfig>) -> Result<Arc<dyn ArticleService>> {
    let service = match database {
        Some(config) => {
            let pool = mysql::connect(config).await?;
            tracing::info!(host = %config.host, port = config.port, database = %config.name, "connected to mysql");

            Service::new(
                Arc::new(mysql::MySqlArticleRepository::new(pool.clone())),
                Arc::new(mysql::MySqlAuthorRepository::new(pool)),
            )
        }
        None => {
            tracing::warn!("no database configured, articles are kept in memory");

            Service::new(
                Arc::new(memory::InMemoryArticleRepository::new()),
                Arc::new(memory::InMemoryAuthorRepository::new()),
            )
        }
    };

    Ok(Arc::new(service))
}
