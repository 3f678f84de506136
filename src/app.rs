// Application state and router construction
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{app_config::AppConfig, handlers, services::VerdictEngine};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<VerdictEngine>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let engine = Arc::new(VerdictEngine::new(&config));
        Self {
            engine,
            config: Arc::new(config),
        }
    }

    pub fn with_engine(config: AppConfig, engine: VerdictEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
        }
    }
}

/// Full router: health probe plus the versioned check API
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(crate::health_check))
        .nest("/api/v1", handlers::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
