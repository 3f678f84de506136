use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use tracing::info;
use validator::Validate;

use crate::{
    app::AppState,
    models::{ApprovalQuery, ApprovalRequest, ApprovalResponse},
    utils::ApiResult,
};

/// User chose "proceed anyway"
/// POST /api/v1/approvals
pub async fn approve_url(
    State(state): State<AppState>,
    payload: Result<Json<ApprovalRequest>, JsonRejection>,
) -> ApiResult<Json<ApprovalResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    state.engine.approve(&request.url).await;
    info!("User approved navigation to {}", request.url);

    Ok(Json(ApprovalResponse {
        url: request.url,
        approved: true,
        expires_in_secs: Some(state.engine.approvals().ttl().as_secs()),
    }))
}

/// GET /api/v1/approvals?url=
pub async fn approval_status(
    State(state): State<AppState>,
    query: Result<Query<ApprovalQuery>, QueryRejection>,
) -> ApiResult<Json<ApprovalResponse>> {
    let Query(query) = query?;
    let approved = state.engine.is_approved(&query.url).await;
    Ok(Json(ApprovalResponse {
        url: query.url,
        approved,
        expires_in_secs: None,
    }))
}
