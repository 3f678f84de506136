use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;
use validator::Validate;

use crate::{
    app::AppState,
    models::{ContentCheckRequest, LinkCheckRequest, NavigationCheckRequest, Verdict},
    utils::{ApiError, ApiResult},
};

// =============================================================================
// CHECK HANDLERS
// =============================================================================

/// Verdict for a navigation the host is about to perform
/// POST /api/v1/check/navigation
pub async fn check_navigation(
    State(state): State<AppState>,
    payload: Result<Json<NavigationCheckRequest>, JsonRejection>,
) -> ApiResult<Json<Verdict>> {
    let Json(request) = payload?;
    request.validate()?;

    let verdict = state.engine.evaluate_navigation(&request.url).await;
    Ok(Json(verdict))
}

/// Verdict for scraped page/message content and its links
/// POST /api/v1/check/content
pub async fn check_content(
    State(state): State<AppState>,
    payload: Result<Json<ContentCheckRequest>, JsonRejection>,
) -> ApiResult<Json<Verdict>> {
    let Json(mut request) = payload?;
    request.validate()?;
    request.validate_custom().map_err(ApiError::ValidationError)?;
    request.sanitize();

    let platform = request.platform();
    let verdict = state
        .engine
        .evaluate_content(&request.content, &request.links, platform)
        .await;

    if verdict.decision {
        info!(
            "Content check on {} flagged with {} reasons",
            platform,
            verdict.reasons.len()
        );
    }
    Ok(Json(verdict))
}

/// Verdict for one link, optionally with surrounding text
/// POST /api/v1/check/link
pub async fn check_link(
    State(state): State<AppState>,
    payload: Result<Json<LinkCheckRequest>, JsonRejection>,
) -> ApiResult<Json<Verdict>> {
    let Json(request) = payload?;
    request.validate()?;

    let verdict = state
        .engine
        .evaluate_link(&request.url, request.context.as_deref())
        .await;
    Ok(Json(verdict))
}
