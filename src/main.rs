//! NOVA Swap proxy server entry point.

use anyhow::{Context, Result};
use nova_swap::config::Config;
use nova_swap::server::{build_router, AppState};
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = Config::from_env();
    info!("Starting NOVA Swap proxy server");
    info!("RPC URL: {}", config.rpc_url);
    info!("Send RPC URL: {}", config.send_rpc_url());
    info!("Aggregation API base: {}", config.jupiter_api_base);

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!("Proxy API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
