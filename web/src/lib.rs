use log::*;
use service::error::{Error, Result};
use tokio::net::TcpListener;

pub use service::AppState;

mod controller;
mod middleware;
pub mod router;
mod sse;

/// Binds the configured address and serves the hub until the server stops.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let listen_address = app_state.config.listen_address();

    let listener = TcpListener::bind(&listen_address)
        .await
        .map_err(|e| Error::bind(listen_address.as_str(), e))?;

    info!("Server starting... listening for connections on http://{listen_address}");

    axum::serve(listener, router::define_routes(app_state))
        .await
        .map_err(Error::serve)
}
