// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams of the system. Each one has a real implementation
// and at least one test double:
//
//   BlobStore       → LocalBlobStore, MemoryBlobStore
//   Scorer          → BurnScorer (the trained BiLSTM)
//   Predictor       → InferenceService
//   TrainingTrigger → BackgroundTrainer
//
// The HTTP layer only sees Predictor and TrainingTrigger, so
// route tests run without a model, a tokenizer or a bucket.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use serde::{Deserialize, Serialize};

use crate::domain::error::{ServiceError, StorageError};
use crate::domain::metrics_report::MetricsReport;
use crate::domain::prediction::PredictionResult;

// ─── BlobStore ────────────────────────────────────────────────────────────────
/// Key-value store of opaque artifact bytes.
///
/// Calls are blocking. Implementations never retry: a failure is
/// reported straight away and the caller decides what to do.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`.
    /// `NotFound` when the key is absent, `Unavailable` otherwise.
    fn get_blob(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Write (or overwrite) the blob stored under `key`.
    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

// ─── Scorer ───────────────────────────────────────────────────────────────────
/// A model forward pass: one fixed-length id sequence in, the
/// probability of the positive class out.
pub trait Scorer: Send + Sync {
    fn score(&self, sequence: &[u32]) -> anyhow::Result<f64>;
}

// ─── Predictor ────────────────────────────────────────────────────────────────
/// Body of a successful health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status:       String,
    pub model_loaded: bool,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self { status: "ok".to_string(), model_loaded: true }
    }
}

/// Everything the HTTP layer can ask of the prediction side.
pub trait Predictor: Send + Sync {
    fn predict(&self, text: &str) -> Result<PredictionResult, ServiceError>;

    fn health(&self) -> Result<HealthStatus, ServiceError>;

    fn metrics(&self) -> Result<MetricsReport, ServiceError>;
}

// ─── TrainingTrigger ──────────────────────────────────────────────────────────
/// Starts a training run out of band and returns immediately.
pub trait TrainingTrigger: Send + Sync {
    fn trigger(&self);
}
