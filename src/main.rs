use std::time::Duration;

use anyhow::Context;
use phishguard_core::{build_router, AppConfig, AppState};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phishguard_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let bind_address = config.server.bind_address.clone();

    info!(
        "Starting PhishGuard verdict engine on {} ({})",
        bind_address, config.server.environment
    );
    if config.credentials.safe_browsing_api_key.is_none() {
        warn!("SAFE_BROWSING_API_KEY not set, reputation checks use local heuristics only");
    }
    if config.credentials.classifier_token.is_none() {
        warn!("CLASSIFIER_TOKEN not set, AI content analysis disabled");
    }

    let sweep_interval = Duration::from_secs(config.approval.sweep_interval_secs.max(1));
    let state = AppState::new(config);

    // Drop expired approvals in the background
    let sweeper = state.engine.approvals().spawn_sweeper(sweep_interval);

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    sweeper.abort();
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
