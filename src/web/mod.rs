//! Axum server wiring: routes, shared state and the serve loop.

pub mod handlers;
pub mod routes;
pub mod state;
pub mod static_files;

use crate::config::WebConfig;
use crate::error::{DashError, Result};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Binds the listener and serves the dashboard until shutdown.
pub async fn run_server(config: WebConfig, state: Arc<AppState>) -> Result<()> {
    let app = routes::ui_routes()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DashError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| DashError::internal(e.to_string()))
}
