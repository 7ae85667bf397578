//! # modelgate-api
//!
//! HTTP front end for the integrity gate.
//!
//! - `POST /upload/` stores a multipart `file`, verifies it, and deletes it
//!   again with a 400 when the digest does not match.
//! - `POST /inference/?file_name=NAME` re-verifies a stored model and hands it
//!   to the model loader.
//! - `GET /health` liveness probe.

pub mod error;
pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{ApiConfig, AppState};

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let limit = state.config.max_upload_bytes;
    Router::new()
        .merge(routes::upload::router())
        .merge(routes::inference::router())
        .merge(routes::health::router())
        .layer(DefaultBodyLimit::max(limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "modelgate API listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("ctrl-c handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
