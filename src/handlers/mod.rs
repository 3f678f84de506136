pub mod admin;
pub mod approvals;
pub mod checks;

use crate::app::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

// Check, approval and host-callback routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/check/navigation", post(checks::check_navigation))
        .route("/check/content", post(checks::check_content))
        .route("/check/link", post(checks::check_link))
        .route(
            "/approvals",
            post(approvals::approve_url).get(approvals::approval_status),
        )
        .route("/credentials", put(admin::update_credentials))
        .route("/stats", get(admin::get_stats))
}
