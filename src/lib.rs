// Library exports for the phishing verdict engine
// The HTTP binary in main.rs is a thin shell over these modules

pub mod app;
pub mod app_config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::{build_router, AppState};
pub use app_config::{AppConfig, ConfigError, CredentialStore, Credentials, FeatureToggles};
pub use models::{Platform, Verdict};
pub use services::{ApprovalCache, InMemoryStats, ScanRecorder, StatsSnapshot, VerdictEngine};
pub use utils::{
    ClassifierClient, ClassifierResult, PatternEngine, PatternMatch, ReputationClient,
    ReputationResult, SimilarityAnalyzer, SimilarityResult, TrustRegistry,
};

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::Json;

    let (safe_browsing, classifier) = state.engine.credential_status().await;
    let features = state.engine.features();

    Json(serde_json::json!({
        "status": "healthy",
        "service": "phishguard-core",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.server.environment.to_string(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "components": {
            "reputation": if safe_browsing { "configured" } else { "heuristic_only" },
            "classifier": if classifier { "configured" } else { "disabled" },
        },
        "features": {
            "url_check": features.url_check,
            "ai_check": features.ai_check,
            "domain_check": features.domain_check,
        }
    }))
}
