//! Catalog Service - HTTP front for the product catalog client
//!
//! Serves category listings and the click-ranked hot list with retrying,
//! cached upstream fetches.

mod config;
mod error;
mod server;

use crate::config::load_config;
use crate::error::Result;
use crate::server::{start_server, ServerState, SharedState};
use catalog_client::ProductService;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env()
        .add_directive("catalog_service=info".parse()?)
        .add_directive("catalog_client=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Catalog Service...");

    let config = load_config();
    info!("Port: {}", config.port);
    info!("Catalog base URL: {}", config.catalog.base_url);
    info!("Stats base URL: {}", config.catalog.stats_base_url);
    info!(
        "Cache: enabled={} ttl={}s max_size={}",
        config.catalog.cache.enabled,
        config.catalog.cache.ttl.as_secs(),
        config.catalog.cache.max_size
    );
    info!("Categories: {}", config.catalog.categories.join(", "));

    let service = ProductService::new(config.catalog);
    let state: SharedState = Arc::new(ServerState::new(service));

    // Start HTTP server (blocking)
    start_server(state, config.port).await?;

    Ok(())
}
