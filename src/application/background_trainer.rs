// ============================================================
// Layer 2 — BackgroundTrainer
// ============================================================
// Runs TrainUseCase off the request path when POST /train asks
// for it, then reloads the inference service.
//
//   trigger() ──► tokio task ──► wait for run lock
//                                  │
//                                  ▼
//                       spawn_blocking(train + reload)
//
// Runs are serialised by an async mutex: a second trigger waits
// for the running one, so two runs never interleave their model
// and tokenizer writes. Training and blob I/O are blocking and
// stay on the blocking pool.
//
// A failed run is logged and dropped. The service keeps serving
// whatever pair it had.

use anyhow::Result;
use std::sync::Arc;
use tokio::{runtime::Handle, sync::Mutex, task::JoinHandle};

use crate::application::{
    inference_service::InferenceService,
    train_use_case::{TrainConfig, TrainUseCase},
};
use crate::domain::traits::{BlobStore, TrainingTrigger};

pub struct BackgroundTrainer {
    store:    Arc<dyn BlobStore>,
    config:   TrainConfig,
    service:  Arc<InferenceService>,
    run_lock: Arc<Mutex<()>>,
}

impl BackgroundTrainer {
    pub fn new(store: Arc<dyn BlobStore>, config: TrainConfig, service: Arc<InferenceService>) -> Self {
        Self { store, config, service, run_lock: Arc::new(Mutex::new(())) }
    }

    /// Start one run on the current tokio runtime. Returns None
    /// when called outside a runtime.
    pub fn spawn_run(&self) -> Option<JoinHandle<()>> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("Cannot start training outside a tokio runtime: {}", e);
                return None;
            }
        };

        let store    = Arc::clone(&self.store);
        let config   = self.config.clone();
        let service  = Arc::clone(&self.service);
        let run_lock = Arc::clone(&self.run_lock);

        Some(handle.spawn(async move {
            let _guard = run_lock.lock().await;
            tracing::info!("Background training run started");

            let outcome = tokio::task::spawn_blocking(move || train_and_reload(store, config, &service)).await;
            match outcome {
                Ok(Ok(pair_id)) => tracing::info!("Background training run finished, serving '{}'", pair_id),
                Ok(Err(e))      => tracing::error!("Background training run failed: {:#}", e),
                Err(e)          => tracing::error!("Background training task aborted: {}", e),
            }
        }))
    }
}

fn train_and_reload(
    store:   Arc<dyn BlobStore>,
    config:  TrainConfig,
    service: &InferenceService,
) -> Result<String> {
    let summary = TrainUseCase::new(store, config).execute()?;
    tracing::info!(
        "Run '{}' trained for {} epochs, test accuracy {:.3}",
        summary.pair_id,
        summary.epochs_run,
        summary.report.global_score.accuracy
    );
    service.reload()
}

impl TrainingTrigger for BackgroundTrainer {
    fn trigger(&self) {
        // The JoinHandle is dropped; the run carries on detached.
        let _ = self.spawn_run();
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::inference_service::ServiceState;
    use crate::data::loader::to_jsonl;
    use crate::domain::review::LabeledReview;
    use crate::infra::blob_store::{MemoryBlobStore, CLEANED_CORPUS_KEY, MODEL_KEY};

    fn tiny_config() -> TrainConfig {
        TrainConfig {
            epochs:          1,
            batch_size:      4,
            embedding_dim:   4,
            sequence_hidden: 3,
            summary_hidden:  2,
            dense_hidden:    4,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_spawn_run_outside_runtime_is_refused() {
        let store   = Arc::new(MemoryBlobStore::new());
        let service = Arc::new(InferenceService::new(store.clone()));
        let trainer = BackgroundTrainer::new(store, tiny_config(), service);
        assert!(trainer.spawn_run().is_none());
    }

    #[tokio::test]
    async fn test_failed_run_leaves_service_untouched() {
        let store   = Arc::new(MemoryBlobStore::new());
        let service = Arc::new(InferenceService::new(store.clone()));
        let trainer = BackgroundTrainer::new(store.clone(), tiny_config(), service.clone());

        trainer.spawn_run().unwrap().await.unwrap();
        assert_eq!(service.state(), ServiceState::Uninitialized);
        assert!(!store.contains(MODEL_KEY));
    }

    #[tokio::test]
    async fn test_successful_run_reloads_the_service() {
        let mut reviews = Vec::new();
        for i in 0..10 {
            reviews.push(LabeledReview::new(format!("love great {}", i), 1));
            reviews.push(LabeledReview::new(format!("awful broke {}", i), 0));
        }
        let store = Arc::new(MemoryBlobStore::new());
        store.put_blob(CLEANED_CORPUS_KEY, &to_jsonl(&reviews).unwrap()).unwrap();

        let service = Arc::new(InferenceService::new(store.clone()));
        let trainer = BackgroundTrainer::new(store.clone(), tiny_config(), service.clone());

        let first  = trainer.spawn_run().unwrap();
        let second = trainer.spawn_run().unwrap();
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(service.state(), ServiceState::Ready);
        assert!(service.pair_id().unwrap().starts_with("run-"));
    }
}
