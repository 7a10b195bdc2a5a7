//! Lecture Portal server.
//!
//! Loads configuration, opens the document store, and serves the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use portal_core::config::AppConfig;
use portal_core::error::AppError;
use portal_database::Store;

#[tokio::main]
async fn main() {
    let env = std::env::var("PORTAL_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Lecture Portal v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(provider = ?config.database.provider, "Opening document store...");
    let store = Store::open(&config.database).await?;
    tracing::info!("Document store ready");

    portal_api::app::run_server(config, store).await
}
