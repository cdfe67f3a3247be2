//! Loanwatch server entry point.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loanwatch_server::{Server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,loanwatch=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Loanwatch Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/loanwatch.toml".to_string());

    let server_config = if std::path::Path::new(&config_path).exists() {
        info!("Loading configuration from {}", config_path);
        ServerConfig::from_file(&config_path)?
    } else {
        info!("Using default configuration");
        ServerConfig::default()
    }
    .apply_env_overrides();

    info!("Loading snapshot table from {}", server_config.data_file);

    let server = match Server::load(server_config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to load snapshot table");
            return Err(e.into());
        }
    };

    server.start().await?;

    Ok(())
}
