// ============================================================
// Layer 6 — Training Metrics
// ============================================================
// Epoch-level bookkeeping for the training loop, and the codec
// for the evaluation report blob.
//
// Metrics recorded per epoch:
//   - epoch:        the epoch number (1, 2, 3, ...)
//   - train_loss:   mean binary cross-entropy over training batches
//   - val_loss:     mean binary cross-entropy on the validation slice
//   - val_accuracy: fraction of validation reviews classified correctly
//
// Early stopping watches val_loss:
//   - a strictly lower val_loss is an improvement and resets the count
//   - `patience` epochs in a row without improvement stop training
//   - the weights from the best epoch are the ones kept
//
// How to read the log:
//   - If val_loss rises while train_loss falls → overfitting,
//     which is exactly what early stopping cuts off
//
// Reference: Prechelt (1998), "Early Stopping - But When?"

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::metrics_report::MetricsReport;

/// One row of metrics for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:        usize,
    pub train_loss:   f64,
    pub val_loss:     f64,
    pub val_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, val_accuracy: f64) -> Self {
        Self { epoch, train_loss, val_loss, val_accuracy }
    }

    /// Returns true if this epoch improved over the previous best val_loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// What the training loop should do after an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochOutcome {
    /// New best: keep these weights
    Improved,
    /// No improvement yet, keep training
    Stalled,
    /// Out of patience: stop and restore the best weights
    Stop,
}

/// Tracks the best validation loss seen so far.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    best:     Option<EpochMetrics>,
    stalled:  usize,
    history:  Vec<EpochMetrics>,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { patience, best: None, stalled: 0, history: Vec::new() }
    }

    pub fn observe(&mut self, m: EpochMetrics) -> EpochOutcome {
        let best_loss = self.best.as_ref().map_or(f64::INFINITY, |b| b.val_loss);
        let outcome = if m.is_improvement(best_loss) {
            self.best    = Some(m.clone());
            self.stalled = 0;
            EpochOutcome::Improved
        } else {
            self.stalled += 1;
            if self.stalled >= self.patience {
                EpochOutcome::Stop
            } else {
                EpochOutcome::Stalled
            }
        };
        self.history.push(m);
        outcome
    }

    pub fn best(&self) -> Option<&EpochMetrics> {
        self.best.as_ref()
    }

    pub fn history(&self) -> &[EpochMetrics] {
        &self.history
    }
}

// ─── Report blob codec ────────────────────────────────────────────────────────

/// JSON has no NaN or infinity, so a report holding one could
/// be written but never read back. Refuse it here.
pub fn encode_report(report: &MetricsReport) -> Result<Vec<u8>> {
    let value = serde_json::to_value(report).context("Cannot serialise metrics report")?;
    if has_null(&value) {
        bail!("Metrics report holds a non-finite score: {:?}", report.global_score);
    }
    serde_json::to_vec_pretty(&value).context("Cannot serialise metrics report")
}

fn has_null(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null      => true,
        serde_json::Value::Object(m) => m.values().any(has_null),
        serde_json::Value::Array(a)  => a.iter().any(has_null),
        _                            => false,
    }
}

pub fn decode_report(bytes: &[u8]) -> Result<MetricsReport> {
    serde_json::from_slice(bytes).context("Metrics blob is not a valid report")
}
