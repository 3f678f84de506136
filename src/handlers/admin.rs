// Host callbacks: credential updates and popup statistics

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use crate::{
    app::AppState,
    models::{CredentialsStatus, CredentialsUpdateRequest},
    services::StatsSnapshot,
    utils::ApiResult,
};

/// PUT /api/v1/credentials
pub async fn update_credentials(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<CredentialsStatus>> {
    let Json(request) = payload?;
    request.validate()?;

    state
        .engine
        .update_credentials(request.safe_browsing_api_key, request.classifier_token)
        .await;

    let (safe_browsing_configured, classifier_configured) =
        state.engine.credential_status().await;
    Ok(Json(CredentialsStatus {
        safe_browsing_configured,
        classifier_configured,
    }))
}

/// GET /api/v1/stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StatsSnapshot>> {
    Ok(Json(state.engine.stats().await?))
}
