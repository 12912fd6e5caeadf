//! Formations API server

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use formations_api::{
    routes, AppState, Config, RestAuthProvider, RestFormationStore, RestProfileStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formations_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing required keys abort startup here
    let config = Config::from_env()?;
    tracing::info!(port = config.port, production = config.production, "Loaded configuration");

    // Wire the hosted provider capabilities
    let auth_provider = RestAuthProvider::new(&config);
    let profiles = RestProfileStore::new(&config);
    let formations = RestFormationStore::new(&config);

    let state = Arc::new(AppState::new(config.clone(), auth_provider, profiles, formations));

    // Create router
    let app = routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Formations API listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
