use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use coursecal::config::AppConfig;
use coursecal::server::create_router;
use coursecal::types::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    let terms = config
        .load_terms()
        .map_err(|e| anyhow!("Failed to load term table: {}", e))?;

    info!(
        api_url = %config.api_url,
        timezone = %config.timezone.name(),
        terms = terms.len(),
        "Loaded configuration"
    );

    let addr = config.bind_addr;
    let state = AppState::new(config, terms).context("Failed to create schedule client")?;
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("coursecal listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
