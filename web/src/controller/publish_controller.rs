//! Controller for webhook deliveries from external services.
//!
//! The endpoint is unauthenticated so third parties can call it directly.

use crate::AppState;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use events::WebhookEvent;
use log::*;

/// POST /publish
///
/// Broadcasts the payload's `event` name to every connected stream when it is
/// a trigger event. The body is only inspected for that one field; anything
/// unparseable is treated as a non-matching event. Always responds `200 OK`,
/// whether or not a broadcast happened, and never waits on the broadcast.
pub async fn publish(State(app_state): State<AppState>, body: Bytes) -> impl IntoResponse {
    match WebhookEvent::from_payload(&body) {
        Some(event) if app_state.trigger_set.matches(&event) => {
            debug!("Publishing webhook event {event}");

            app_state.event_publisher.publish(event).await;
        }
        Some(event) => {
            debug!("Ignoring webhook event {event}, not a trigger event");
        }
        None => {
            debug!("Ignoring webhook payload without an event name");
        }
    }

    (StatusCode::OK, "OK")
}
