use crate::{
    controller::{health_check_controller, publish_controller, subscription_controller},
    middleware::auth::require_basic_auth,
    sse::handler::stream_handler,
    AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

const INDEX_FILE: &str = "index.html";

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(index_routes(app_state.clone()))
        .merge(stream_routes(app_state.clone()))
        .merge(publish_routes(app_state.clone()))
        .merge(subscription_routes(app_state.clone()))
        .merge(health_routes())
        .nest_service("/static", static_routes(&app_state))
}

/// The index page, gated by Basic auth when credentials are configured
fn index_routes(app_state: AppState) -> Router {
    Router::new()
        .route_service(
            "/",
            ServeFile::new(app_state.config.static_dir().join(INDEX_FILE)),
        )
        .route_layer(from_fn_with_state(app_state, require_basic_auth))
}

/// The event stream, gated by Basic auth when credentials are configured
fn stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/stream", get(stream_handler))
        .route_layer(from_fn_with_state(app_state.clone(), require_basic_auth))
        .with_state(app_state)
}

/// Webhook ingestion (no authentication - external services call it directly)
fn publish_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/publish", post(publish_controller::publish))
        .with_state(app_state)
}

fn subscription_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/subscriptions", get(subscription_controller::count))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

// Assets loaded by the index page (scripts, styles)
fn static_routes(app_state: &AppState) -> ServeDir {
    ServeDir::new(app_state.config.static_dir())
}
