//! Mangaview - caching web proxy for the MangaDex catalog
//!
//! This service reshapes MangaDex search, manga, and chapter data into JSON
//! for browser consumption and proxies cover/page images through in-memory
//! expiring caches.

mod cache;
mod catalog;
mod error;
mod random;
mod server;
mod types;

use crate::catalog::CatalogService;
use crate::error::{AppError, Result};
use crate::random::RandomTitleClient;
use crate::server::{start_server, ServerState, SharedState};
use crate::types::AppConfig;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("mangaview=info".parse()?);

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

    info!("Starting Mangaview...");

    // Load configuration from environment
    let config = load_config();
    info!("Port: {}", config.port);
    info!("Cache TTL: {} seconds", config.cache_ttl_secs);
    info!("Cache capacity: {} entries per cache", config.cache_max_entries);

    // Create catalog and random-title clients
    let catalog = CatalogService::new(&config);
    let random = RandomTitleClient::new(config.random_max_attempts);

    // Create shared state
    let state: SharedState = Arc::new(ServerState::new(catalog, random));

    // Start HTTP server (blocking)
    start_server(state, config.port)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

fn load_config() -> AppConfig {
    let defaults = AppConfig::default();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(defaults.port);

    let cache_ttl_secs = std::env::var("CACHE_TTL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(defaults.cache_ttl_secs);

    let cache_max_entries = std::env::var("CACHE_MAX_ENTRIES")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(defaults.cache_max_entries);

    let random_max_attempts = std::env::var("RANDOM_MAX_ATTEMPTS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(defaults.random_max_attempts);

    AppConfig {
        port,
        cache_ttl_secs,
        cache_max_entries,
        random_max_attempts,
    }
}
