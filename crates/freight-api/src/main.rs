//! OpenFreight Messaging API - Main Entry Point

use std::sync::Arc;

use freight_api::config::ApiConfig;
use freight_api::{build_router, ApiState};
use freight_messaging::InMemoryDirectory;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("OpenFreight Messaging API v{}", env!("CARGO_PKG_VERSION"));

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "/etc/openfreight/api.json".into());

    let config = ApiConfig::load(&config_path).unwrap_or_else(|_| {
        tracing::warn!("Config not found, using defaults");
        ApiConfig::default()
    });

    let directory = Arc::new(InMemoryDirectory::new());
    for actor in &config.actors {
        directory.add(actor.clone());
    }
    tracing::info!(actors = directory.count(), "identity registry loaded");

    let app = build_router(ApiState::new(directory));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
