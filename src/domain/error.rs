// ============================================================
// Layer 3 — Error Kinds
// ============================================================
// Typed failures at the two boundaries callers need to tell
// apart:
//
//   StorageError — what the artifact store gateway reports
//   ServiceError — what the inference service and the HTTP
//                  layer report
//
// Everything behind these boundaries (training, data prep,
// CLI) stays on anyhow::Result like the rest of the pipeline.
//
// Reference: thiserror crate documentation

use thiserror::Error;

/// Failures of a blob store call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Transport, permission or timeout failure talking to the store
    #[error("storage unavailable for '{key}': {reason}")]
    Unavailable { key: String, reason: String },

    /// The key does not exist on read
    #[error("blob not found: '{0}'")]
    NotFound(String),
}

impl StorageError {
    pub fn unavailable(key: impl Into<String>, reason: impl ToString) -> Self {
        StorageError::Unavailable { key: key.into(), reason: reason.to_string() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Failures surfaced by the prediction service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Artifacts were never loaded, or loading failed
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The requested resource (metrics) was not loaded
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body could not be understood
    #[error("invalid request: {0}")]
    Validation(String),

    /// The model or tokenizer failed on a well-formed request
    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(key)     => ServiceError::NotFound(key),
            StorageError::Unavailable { .. } => ServiceError::Unavailable(e.to_string()),
        }
    }
}
