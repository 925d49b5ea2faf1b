use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use backend_lib::{
    config::Settings,
    http_router,
    storage::{seed_default_roles, MemoryStore},
    AppState,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration
    // Try to load with explicit path if default doesn't work
    let settings = Settings::load()
        .or_else(|_| Settings::load_from("config/default.toml"))
        .context("failed to load settings")?;

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    // Create storage and install the role catalog
    let store = MemoryStore::new();
    seed_default_roles(&store)
        .await
        .context("failed to seed role catalog")?;

    // Create application state
    let state = Arc::new(AppState::new(store, &settings)?);

    // Create the router
    let app = http_router::create_router(state);

    // Start the server
    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", settings.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
