//! Slack-Search entry point

use anyhow::{Context, Result};
use slack_search::{
    config,
    engines::EngineLoader,
    network::HttpClient,
    web::{create_router, AppState, SLASH_COMMAND_PATH},
};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting Slack-Search v{}", slack_search::VERSION);

    let settings = config::load()?;
    settings
        .validate()
        .context("refusing to start without a usable Slack configuration")?;

    let client = HttpClient::with_settings(&settings.outgoing)?;

    let registry = EngineLoader::load(&settings);
    if registry.is_empty() {
        warn!("No search backends configured; every search will say so");
    } else {
        info!("Search backends: {}", registry.names().join(", "));
    }

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    let state = AppState::new(settings, registry, client);
    let app = create_router(state);

    info!("Listening on http://{}{}", addr, SLASH_COMMAND_PATH);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
