//! # HTTP Server
//!
//! Combines all routers and runs the primary and replica listeners over one
//! shared catalog state.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::ServerConfig;
use super::observability_routes::observability_routes;
use super::productos_routes::productos_routes;
use super::pull_routes::pull_routes;
use super::state::CatalogState;

/// HTTP server for the product catalog
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<CatalogState>,
    router: Router,
}

impl HttpServer {
    /// Create a server over a fresh catalog with default delivery timing
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a server over a fresh catalog
    pub fn with_config(config: ServerConfig) -> Self {
        Self::with_state(config, Arc::new(CatalogState::default()))
    }

    /// Create a server over existing state
    pub fn with_state(config: ServerConfig, state: Arc<CatalogState>) -> Self {
        let router = Self::build_router(&config, state.clone());
        Self {
            config,
            state,
            router,
        }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServerConfig, state: Arc<CatalogState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(productos_routes(state.clone()))
            .merge(pull_routes(state.clone()))
            .merge(observability_routes(state))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Shared catalog state
    pub fn state(&self) -> Arc<CatalogState> {
        self.state.clone()
    }

    /// Get the router (for testing)
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind the configured listeners and serve until `shutdown` is cancelled.
    pub async fn start(self, shutdown: CancellationToken) -> Result<(), std::io::Error> {
        let primary = TcpListener::bind(self.config.socket_addr()).await?;
        let replica = match self.config.replica_socket_addr() {
            Some(addr) => Some(TcpListener::bind(addr).await?),
            None => None,
        };

        self.serve(primary, replica, shutdown).await
    }

    /// Serve on already bound listeners until `shutdown` is cancelled.
    ///
    /// Both listeners share the same router and therefore the same catalog.
    pub async fn serve(
        self,
        primary: TcpListener,
        replica: Option<TcpListener>,
        shutdown: CancellationToken,
    ) -> Result<(), std::io::Error> {
        info!(addr = %primary.local_addr()?, "primary listening");
        if let Some(replica) = &replica {
            info!(addr = %replica.local_addr()?, "replica listening");
        }

        let primary_router = self.router.clone();
        let primary_shutdown = shutdown.clone();
        let primary_task = async move {
            axum::serve(primary, primary_router)
                .with_graceful_shutdown(primary_shutdown.cancelled_owned())
                .await
        };

        let replica_router = self.router;
        let replica_task = async move {
            match replica {
                Some(listener) => {
                    axum::serve(listener, replica_router)
                        .with_graceful_shutdown(shutdown.cancelled_owned())
                        .await
                }
                None => Ok(()),
            }
        };

        tokio::try_join!(primary_task, replica_task)?;
        info!("http server stopped");
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}
