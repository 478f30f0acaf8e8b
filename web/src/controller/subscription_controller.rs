use crate::AppState;

use axum::extract::State;
use axum::response::IntoResponse;

/// GET /subscriptions
///
/// Reports how many streams are currently subscribed. Read-only.
pub async fn count(State(app_state): State<AppState>) -> impl IntoResponse {
    format!(
        "Current subscription count: {}",
        app_state.sse_manager.subscription_count()
    )
}
