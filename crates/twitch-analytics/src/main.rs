use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use twitch_analytics::auth::MemoryTokenCache;
use twitch_analytics::config::Config;
use twitch_analytics::server::{AppState, Server};
use twitch_analytics::twitch::TwitchClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads .env as well, so RUST_LOG may come from there
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Twitch Analytics");

    let addr = config.bind_addr()?;
    let client = TwitchClient::new(
        config.credentials(),
        config.http_timeout(),
        Arc::new(MemoryTokenCache::new()),
    )?;

    Server::new(AppState::new(client)).run(addr).await
}
