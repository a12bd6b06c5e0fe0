//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Mount a fully registered `Mux` behind `axum::serve`
//! - Apply the server-wide request timeout
//! - Bind to a listener and shut down gracefully

use std::time::Duration;

use axum::Router as AxumRouter;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::lifecycle::shutdown::wait_for;
use crate::routing::Mux;

/// HTTP server serving one route tree.
pub struct HttpServer {
    router: AxumRouter,
    config: ServerConfig,
    routes: usize,
}

impl HttpServer {
    /// Create a server for `mux`. Registration must be finished: the route
    /// table is frozen from the server's point of view.
    pub fn new(config: ServerConfig, mux: Mux) -> Self {
        let routes = mux.routes().len();
        let router = Self::build_router(&config, mux);
        Self {
            router,
            config,
            routes,
        }
    }

    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, mux: Mux) -> AxumRouter {
        AxumRouter::new()
            .fallback_service(mux)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight
    /// requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
