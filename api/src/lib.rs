//! HTTP surface for the book question-answering backend.
//!
//! Routes:
//! - `POST /query`  → grounded answer + audit context
//! - `GET  /health` → provider health snapshot
//! - everything else falls back to the bundled static demo page
//!
//! Query handling is stateless and independently concurrent per request;
//! handlers share only read access to the state built once in
//! [`core::app_state::AppState::from_env`].

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    routes::{health_route::health_route, query::query_route::query_route},
};

/// Builds state from the environment and serves the API until Ctrl+C.
///
/// # Errors
/// Returns [`AppError::Config`] when required configuration is missing
/// (fails fast, before binding), [`AppError::Bind`]/[`AppError::Server`]
/// for listener failures.
pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env()?);

    let app = Router::new()
        .route("/query", post(query_route))
        .route("/health", get(health_route))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!("listening on {host_url}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
