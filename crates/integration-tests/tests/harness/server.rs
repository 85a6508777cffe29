//! Test server wrapper that starts Scribe on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use scribe_article::ArticleService;
use scribe_config::Config;
use scribe_server::Server;
use tokio_util::sync::CancellationToken;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Without a `[database]` section the in-memory store is used.
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        Self::spawn(Server::new(config).await?).await
    }

    /// Start a test server around a custom article service
    pub async fn start_with_service(config: Config, service: Arc<dyn ArticleService>) -> anyhow::Result<Self> {
        Self::spawn(Server::with_service(&config, service)).await
    }

    async fn spawn(server: Server) -> anyhow::Result<Self> {
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(
                listener,
                server.into_router().into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                shutdown_clone.cancelled().await;
            })
            .await
            .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self { addr, shutdown, client })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Server address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
