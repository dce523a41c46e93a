//! Radio grid HTTP server binary.
//!
//! This is the main entry point for the REST API server.
//! It loads the configuration, initializes the repository, sets up the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Empty in-memory store
//! cargo run --bin radio-grid-server
//!
//! # Store seeded from a config file
//! RADIO_CONFIG=backend/radio.toml cargo run --bin radio-grid-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RADIO_CONFIG`: Path to radio.toml (default: searched in standard locations)
//! - `REPOSITORY_TYPE`: Overrides the configured repository type
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use radio_grid::db::{RepositoryConfig, RepositoryFactory};
use radio_grid::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting radio grid HTTP server");

    let config = RepositoryConfig::load_or_default().context("Failed to load radio.toml")?;
    let repository = RepositoryFactory::from_repository_config(&config)
        .await
        .context("Failed to initialize repository")?;
    info!("Repository initialized successfully");

    // Create router with all endpoints
    let app = create_router(AppState::new(repository));

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
