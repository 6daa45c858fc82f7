// ============================================================
// Layer 1 — HTTP Handlers
// ============================================================
// Thin adapters: pull the request apart, call the Predictor or
// TrainingTrigger held in AppState, shape the JSON reply. No
// pipeline logic lives here.
//
// The forward pass is CPU work, so /predict runs it on the
// blocking pool rather than on the request task.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::api::{error::detail_response, AppState};
use crate::domain::{
    error::ServiceError,
    metrics_report::MetricsReport,
    prediction::PredictionResult,
    traits::HealthStatus,
};

pub const ENDPOINTS: &[&str] = &["/health", "/predict", "/metrics", "/train"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootInfo {
    pub status:              String,
    pub available_endpoints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub status:      String,
    pub api_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub model_performance: MetricsReport,
    pub system_info:       SystemInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainResponse {
    pub message: String,
}

// ── GET / ─────────────────────────────────────────────────────────────────────
pub async fn root() -> Json<RootInfo> {
    Json(RootInfo {
        status:              "alive".to_string(),
        available_endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

// ── GET /health ───────────────────────────────────────────────────────────────
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, Response> {
    state.predictor.health().map(Json).map_err(|e| {
        tracing::debug!("Health check failed: {}", e);
        detail_response(StatusCode::SERVICE_UNAVAILABLE, "Model not loaded")
    })
}

// ── POST /predict ─────────────────────────────────────────────────────────────
#[instrument(skip(state, payload))]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ServiceError> {
    let Json(request) = payload.map_err(|rejection| ServiceError::Validation(rejection.body_text()))?;

    let predictor = Arc::clone(&state.predictor);
    let result = tokio::task::spawn_blocking(move || predictor.predict(&request.content))
        .await
        .map_err(|e| ServiceError::Inference(format!("prediction task aborted: {e}")))??;

    tracing::info!("Prediction: {} ({:.4})", result.label, result.confidence);
    Ok(Json(result))
}

// ── GET /metrics ──────────────────────────────────────────────────────────────
#[instrument(skip(state))]
pub async fn metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>, Response> {
    let report = state.predictor.metrics().map_err(|e| {
        tracing::debug!("Metrics unavailable: {}", e);
        detail_response(StatusCode::NOT_FOUND, "Metrics not found")
    })?;

    Ok(Json(MetricsResponse {
        model_performance: report,
        system_info: SystemInfo {
            status:      "live".to_string(),
            api_version: "v1".to_string(),
        },
    }))
}

// ── POST /train ───────────────────────────────────────────────────────────────
#[instrument(skip(state))]
pub async fn train(State(state): State<AppState>) -> Json<TrainResponse> {
    state.trainer.trigger();
    tracing::info!("Training run requested");
    Json(TrainResponse {
        message: "Training pipeline triggered in background".to_string(),
    })
}
