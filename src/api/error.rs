// ============================================================
// Layer 1 — HTTP Error Mapping
// ============================================================
// Every failure leaves the API as a JSON body of the form
// {"detail": "..."}:
//
//   Unavailable → 503  "Model service unavailable"
//   NotFound    → 404  "Metrics not found"
//   Validation  → 422  the parser's own message
//   Inference   → 500  "Prediction failed"
//
// The internal reason is logged and never sent to the client.
// Validation messages are the exception: they describe the
// client's own request body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

/// A status code with a {"detail"} body.
pub fn detail_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(Detail { detail: detail.into() })).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::Unavailable(reason) => {
                tracing::warn!("Request refused, service unavailable: {}", reason);
                detail_response(StatusCode::SERVICE_UNAVAILABLE, "Model service unavailable")
            }
            ServiceError::NotFound(what) => {
                tracing::debug!("Nothing loaded for {}", what);
                detail_response(StatusCode::NOT_FOUND, "Metrics not found")
            }
            ServiceError::Validation(msg) => {
                detail_response(StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            ServiceError::Inference(reason) => {
                tracing::error!("Inference failed: {}", reason);
                detail_response(StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed")
            }
        }
    }
}
