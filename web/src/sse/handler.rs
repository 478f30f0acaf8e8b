use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use log::*;

/// GET /stream
///
/// Opens a long-lived `text/event-stream` response for one client. The
/// response body never completes on its own; when the client disconnects the
/// body is dropped and the client's subscription is released with it.
pub(crate) async fn stream_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    debug!("Establishing event stream");

    let frames = app_state
        .sse_manager
        .open_stream(app_state.config.keep_alive_interval());

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(frames),
    )
}
