// ============================================================
// Layer 1 — HTTP API (axum)
// ============================================================
// The network face of the serving process:
//
//   GET  /         liveness and the list of endpoints
//   GET  /health   200 once the artifact pair is loaded, else 503
//   POST /predict  {"content"} → {"label", "confidence"}
//   GET  /metrics  the evaluation report of the loaded run
//   POST /train    start a training run in the background
//
// Handlers only see the Predictor and TrainingTrigger traits,
// so tests drive the router with stubs and no model at all.
//
//   handlers.rs — one async fn per route
//   error.rs    — ServiceError → status code + {"detail"}
//
// Reference: axum documentation (Router, State, IntoResponse)

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};

use crate::domain::traits::{Predictor, TrainingTrigger};

/// Shared by every handler. Cloning copies two Arcs.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    pub trainer:   Arc<dyn TrainingTrigger>,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>, trainer: Arc<dyn TrainingTrigger>) -> Self {
        Self { predictor, trainer }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/",        get(handlers::root))
        .route("/health",  get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/metrics", get(handlers::metrics))
        .route("/train",   post(handlers::train))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(())  => tracing::info!("Shutdown signal received"),
        Err(e)  => tracing::error!("Cannot listen for shutdown signal: {}", e),
    }
}
