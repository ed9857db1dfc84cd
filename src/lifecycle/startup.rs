//! Startup orchestration.
//!
//! # Responsibilities
//! - Provision the routing table (empty) and hand it to the HTTP layer
//! - Bind listeners and begin accepting traffic
//! - Stop cleanly on shutdown
//!
//! # Design Decisions
//! - Fail fast: any bind error is fatal
//! - Metrics exporter starts before listeners
//! - start/stop hold no resources; the table has no background tasks

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RouterConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::routing::RoutingTable;

/// Errors that abort startup or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {listener} listener on {address}: {source}")]
    Bind {
        listener: &'static str,
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// A provisioned router instance: one table and the config it runs with.
pub struct RouterApp {
    table: Arc<RoutingTable>,
    config: RouterConfig,
}

impl RouterApp {
    /// Provision a router with an empty routing table.
    pub fn provision(config: RouterConfig) -> Self {
        Self {
            table: Arc::new(RoutingTable::new()),
            config,
        }
    }

    /// Handle to the routing table owned by this instance.
    pub fn table(&self) -> Arc<RoutingTable> {
        self.table.clone()
    }

    pub fn start(&self) {
        tracing::info!("Dynamic router started");
    }

    pub fn stop(&self) {
        tracing::info!(routes = self.table.len(), "Dynamic router stopped");
    }

    /// Bind the configured listeners and serve until `shutdown` fires.
    pub async fn serve(&self, shutdown: &Shutdown) -> Result<(), StartupError> {
        if self.config.observability.metrics_enabled {
            match self.config.observability.metrics_address.parse::<SocketAddr>() {
                Ok(addr) => metrics::init_metrics(addr),
                Err(_) => tracing::error!(
                    metrics_address = %self.config.observability.metrics_address,
                    "Failed to parse metrics address"
                ),
            }
        }

        let listener = bind("proxy", &self.config.listener.bind_address).await?;
        let admin_listener = if self.config.admin.enabled {
            Some(bind("admin", &self.config.admin.bind_address).await?)
        } else {
            None
        };

        let server = HttpServer::new(self.config.clone(), self.table());
        server.run(listener, admin_listener, shutdown.subscribe()).await?;
        Ok(())
    }
}

async fn bind(listener: &'static str, address: &str) -> Result<TcpListener, StartupError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            listener,
            address: address.to_string(),
            source,
        })
}

/// Run a router process until SIGINT/SIGTERM.
pub async fn run(config: RouterConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        admin_enabled = config.admin.enabled,
        admin_address = %config.admin.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let app = RouterApp::provision(config);
    let shutdown = Arc::new(Shutdown::new());

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    app.start();
    let result = app.serve(&shutdown).await;
    app.stop();
    result
}
