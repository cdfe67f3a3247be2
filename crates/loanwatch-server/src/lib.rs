//! # Loanwatch Server
//!
//! REST server behind the loan default monitoring dashboard.
//!
//! ## Features
//!
//! - Catalog endpoint for the selection widgets
//! - Statistic, period series and rating histogram endpoints
//! - Health endpoint
//! - Configuration via TOML file
//!
//! ## Usage
//!
//! ```ignore
//! use loanwatch_server::{Server, ServerConfig};
//!
//! let server = Server::load(ServerConfig::default())?;
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use loanwatch_ext_file::open_snapshot_source;
use loanwatch_portfolio::{FilterEngine, PortfolioResult, PortfolioStore};

pub use config::ServerConfig;

/// The Loanwatch server.
pub struct Server {
    config: ServerConfig,
    engine: Arc<FilterEngine>,
}

impl Server {
    /// Create a new server around an engine.
    pub fn new(config: ServerConfig, engine: Arc<FilterEngine>) -> Self {
        Self { config, engine }
    }

    /// Load the configured snapshot file and build the engine over it.
    ///
    /// Fails if the file cannot be read; the server never starts on a
    /// partially loaded table.
    pub fn load(config: ServerConfig) -> PortfolioResult<Self> {
        let source = open_snapshot_source(&config.data_file)?;
        let store = PortfolioStore::load(&*source)?;
        let engine = FilterEngine::with_config(Arc::new(store), config.engine.clone());

        Ok(Self::new(config, Arc::new(engine)))
    }

    /// Returns the engine.
    pub fn engine(&self) -> &Arc<FilterEngine> {
        &self.engine
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.engine.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Start the server.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let addr = SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        );

        info!(
            rows = self.engine.store().len(),
            "Starting Loanwatch server on {}", addr
        );

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await
    }
}
