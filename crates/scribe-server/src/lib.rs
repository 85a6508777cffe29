mod articles;
mod cors;
pub mod dispatch;
mod fallback;
mod health;
mod timeout;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::middleware;
use scribe_article::ArticleService;
use scribe_config::Config;
use tower_http::trace::TraceLayer;

pub use articles::article_router;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured database cannot be reached
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let service = scribe_article::build_service(config.database.as_ref()).await?;
        Ok(Self::with_service(&config, service))
    }

    /// Build the server around an existing article service
    pub fn with_service(config: &Config, service: Arc<dyn ArticleService>) -> Self {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 9090)));

        let mut app = articles::article_router(service);

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app
            .fallback(fallback::not_found)
            .method_not_allowed_fallback(fallback::method_not_allowed);

        // Apply middleware layers (innermost first)

        if config.server.request_timeout == 0 {
            tracing::info!(
                timeout = ?config.server.request_timeout(),
                "request_timeout is 0, using the default"
            );
        }
        app = app.layer(middleware::from_fn_with_state(
            config.server.request_timeout(),
            timeout::timeout_middleware,
        ));

        app = app
            .layer(middleware::from_fn(dispatch::propagation_middleware))
            .layer(middleware::from_fn(dispatch::recovery_middleware));

        if config.server.cors.enabled {
            app = app
                .layer(cors::cors_layer(&config.server.cors))
                .layer(middleware::from_fn(cors::preflight_no_content));
        }

        app = app.layer(TraceLayer::new_for_http());

        Self {
            router: app,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
