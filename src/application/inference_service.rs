// ============================================================
// Layer 2 — InferenceService
// ============================================================
// Owns the serving state and the loaded artifact pair. Built
// once at startup and shared by Arc with the HTTP layer.
//
// State machine:
//
//   UNINITIALIZED ──initialize()──► READY   (pair loaded)
//                                └► FAILED  (load error)
//
// initialize() runs once; later calls are no-ops. There is no
// automatic retry out of FAILED.
//
// The model and tokenizer live together in one ArtifactPair
// behind one Arc. reload() builds a complete new pair first and
// only then replaces the Arc, so a request sees either the old
// pair or the new one, never a mix. In-flight requests keep the
// old pair alive until they finish.
//
// A missing metrics blob does not stop the service from
// becoming READY; metrics() then reports NotFound.

use anyhow::{bail, Context, Result};
use std::sync::{Arc, RwLock};

use crate::data::{
    normalizer::Normalizer,
    sequence::{pad_post, SEQUENCE_LEN},
};
use crate::domain::{
    error::ServiceError,
    metrics_report::MetricsReport,
    prediction::PredictionResult,
    traits::{BlobStore, HealthStatus, Predictor, Scorer},
};
use crate::infra::{
    blob_store::{METRICS_KEY, MODEL_KEY, TOKENIZER_KEY},
    metrics::decode_report,
    tokenizer_store::VocabTokenizer,
};
use crate::ml::inferencer::BurnScorer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Ready,
    Failed,
}

/// A tokenizer and a model from the same training run.
pub struct ArtifactPair {
    pub pair_id:   String,
    pub tokenizer: VocabTokenizer,
    pub scorer:    Arc<dyn Scorer>,
    pub metrics:   Option<MetricsReport>,
}

enum Slot {
    Uninitialized,
    Ready(Arc<ArtifactPair>),
    Failed(String),
}

pub struct InferenceService {
    store:      Arc<dyn BlobStore>,
    normalizer: Normalizer,
    slot:       RwLock<Slot>,
}

impl InferenceService {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store, normalizer: Normalizer::new(), slot: RwLock::new(Slot::Uninitialized) }
    }

    /// A service that starts READY with an already built pair.
    pub fn with_pair(store: Arc<dyn BlobStore>, pair: ArtifactPair) -> Self {
        Self {
            store,
            normalizer: Normalizer::new(),
            slot: RwLock::new(Slot::Ready(Arc::new(pair))),
        }
    }

    /// Load the artifact pair once. Blocking: call it from a
    /// blocking thread, not a request task.
    pub fn initialize(&self) -> ServiceState {
        if self.state() != ServiceState::Uninitialized {
            return self.state();
        }

        let next = match self.load_pair() {
            Ok(pair) => {
                tracing::info!("Inference service ready with pair '{}'", pair.pair_id);
                Slot::Ready(Arc::new(pair))
            }
            Err(e) => {
                tracing::error!("Inference service failed to load artifacts: {:#}", e);
                Slot::Failed(format!("{:#}", e))
            }
        };

        match self.slot.write() {
            Ok(mut slot) => {
                if matches!(*slot, Slot::Uninitialized) {
                    *slot = next;
                }
            }
            Err(_) => tracing::error!("Inference service state lock poisoned"),
        }
        self.state()
    }

    /// Load a fresh pair and swap it in. On failure the current
    /// state and pair are kept and the error is returned.
    pub fn reload(&self) -> Result<String> {
        let pair    = self.load_pair()?;
        let pair_id = pair.pair_id.clone();
        let mut slot = self.slot
            .write()
            .map_err(|_| anyhow::anyhow!("Inference service state lock poisoned"))?;
        *slot = Slot::Ready(Arc::new(pair));
        tracing::info!("Inference service reloaded pair '{}'", pair_id);
        Ok(pair_id)
    }

    pub fn state(&self) -> ServiceState {
        match self.slot.read().as_deref() {
            Ok(Slot::Uninitialized) => ServiceState::Uninitialized,
            Ok(Slot::Ready(_))      => ServiceState::Ready,
            Ok(Slot::Failed(_)) | Err(_) => ServiceState::Failed,
        }
    }

    pub fn pair_id(&self) -> Option<String> {
        self.current().ok().map(|p| p.pair_id.clone())
    }

    fn current(&self) -> Result<Arc<ArtifactPair>, ServiceError> {
        let slot = self.slot
            .read()
            .map_err(|_| ServiceError::Unavailable("state lock poisoned".into()))?;
        match &*slot {
            Slot::Ready(pair)    => Ok(Arc::clone(pair)),
            Slot::Uninitialized  => Err(ServiceError::Unavailable("model not loaded yet".into())),
            Slot::Failed(reason) => Err(ServiceError::Unavailable(reason.clone())),
        }
    }

    // ── Loading ───────────────────────────────────────────────────────────────
    fn load_pair(&self) -> Result<ArtifactPair> {
        let tokenizer_bytes = self.store
            .get_blob(TOKENIZER_KEY)
            .context("Cannot load tokenizer")?;
        let model_bytes = self.store
            .get_blob(MODEL_KEY)
            .context("Cannot load model")?;

        let tokenizer = VocabTokenizer::from_bytes(&tokenizer_bytes)?;
        let scorer    = BurnScorer::from_bytes(&model_bytes)?;

        let header = scorer.header();
        if header.pair_id != tokenizer.pair_id() {
            bail!(
                "Model '{}' and tokenizer '{}' come from different training runs",
                header.pair_id,
                tokenizer.pair_id()
            );
        }
        if header.vocab_size != tokenizer.vocab_size() {
            bail!(
                "Model expects {} ids but tokenizer has {}",
                header.vocab_size,
                tokenizer.vocab_size()
            );
        }

        let metrics = match self.store.get_blob(METRICS_KEY) {
            Ok(bytes)                   => Some(decode_report(&bytes)?),
            Err(e) if e.is_not_found()  => {
                tracing::warn!("No metrics report at '{}', serving without one", METRICS_KEY);
                None
            }
            Err(e) => return Err(e).context("Cannot load metrics report"),
        };

        Ok(ArtifactPair {
            pair_id: header.pair_id.clone(),
            tokenizer,
            scorer: Arc::new(scorer),
            metrics,
        })
    }
}

impl Predictor for InferenceService {
    fn predict(&self, text: &str) -> Result<PredictionResult, ServiceError> {
        let pair = self.current()?;

        let cleaned = self.normalizer.normalize(text);
        let ids     = pair.tokenizer
            .encode(&cleaned)
            .map_err(|e| ServiceError::Inference(e.to_string()))?;
        let input   = pad_post(ids, SEQUENCE_LEN);

        let score = pair.scorer
            .score(&input)
            .map_err(|e| ServiceError::Inference(e.to_string()))?;
        if !(0.0..=1.0).contains(&score) {
            return Err(ServiceError::Inference(format!("score {} outside [0, 1]", score)));
        }

        tracing::debug!("Predicted score {:.4} for {} words", score, cleaned.split(' ').count());
        Ok(PredictionResult::from_score(score))
    }

    fn health(&self) -> Result<HealthStatus, ServiceError> {
        self.current().map(|_| HealthStatus::ok())
    }

    fn metrics(&self) -> Result<MetricsReport, ServiceError> {
        self.current()?
            .metrics
            .clone()
            .ok_or_else(|| ServiceError::NotFound(METRICS_KEY.to_string()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::Label;
    use crate::infra::{
        blob_store::MemoryBlobStore,
        checkpoint::{encode_model, ArtifactHeader},
        metrics::encode_report,
    };
    use crate::ml::model::SentimentModelConfig;
    use std::sync::Mutex;

    /// Returns a fixed score and remembers the last input.
    struct FixedScorer {
        score: f64,
        seen:  Mutex<Vec<u32>>,
    }

    impl FixedScorer {
        fn new(score: f64) -> Arc<Self> {
            Arc::new(Self { score, seen: Mutex::new(Vec::new()) })
        }
    }

    impl Scorer for FixedScorer {
        fn score(&self, sequence: &[u32]) -> anyhow::Result<f64> {
            *self.seen.lock().unwrap() = sequence.to_vec();
            Ok(self.score)
        }
    }

    fn tokenizer(pair_id: &str) -> VocabTokenizer {
        VocabTokenizer::fit(&["good product not good".to_string()], 100, pair_id).unwrap()
    }

    fn service_with(scorer: Arc<dyn Scorer>, metrics: Option<MetricsReport>) -> InferenceService {
        let pair = ArtifactPair {
            pair_id:   "p1".into(),
            tokenizer: tokenizer("p1"),
            scorer,
            metrics,
        };
        InferenceService::with_pair(Arc::new(MemoryBlobStore::new()), pair)
    }

    /// Writes a real (tiny, untrained) pair into a store.
    fn store_pair(store: &MemoryBlobStore, model_pair: &str, tokenizer_pair: &str) {
        let tok    = tokenizer(tokenizer_pair);
        let cfg    = SentimentModelConfig::new(tok.vocab_size())
            .with_embedding_dim(4)
            .with_sequence_hidden(3)
            .with_summary_hidden(2)
            .with_dense_hidden(4);
        let model  = cfg.init::<burn::backend::NdArray>(&Default::default());
        let header = ArtifactHeader {
            pair_id:    model_pair.into(),
            vocab_size: tok.vocab_size(),
            model:      cfg,
        };
        store.put_blob(MODEL_KEY, &encode_model(model, &header).unwrap()).unwrap();
        store.put_blob(TOKENIZER_KEY, &tok.to_bytes().unwrap()).unwrap();
    }

    #[test]
    fn test_high_score_predicts_positive() {
        let service = service_with(FixedScorer::new(0.85), None);
        let result  = service.predict("Great product").unwrap();
        assert_eq!(result.label, Label::Positive);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_low_score_predicts_negative() {
        let service = service_with(FixedScorer::new(0.15), None);
        let result  = service.predict("Terrible").unwrap();
        assert_eq!(result.label, Label::Negative);
        assert_eq!(result.confidence, 0.15);
    }

    #[test]
    fn test_scorer_sees_a_padded_fixed_length_sequence() {
        let scorer  = FixedScorer::new(0.5);
        let service = service_with(scorer.clone(), None);
        service.predict("This is not a good product, unknownword").unwrap();

        let seen = scorer.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), SEQUENCE_LEN);
        // "not good product" are known; the unknown word is dropped
        assert!(seen[..3].iter().all(|&id| id >= 2));
        assert!(seen[3..].iter().all(|&id| id == 0));
    }

    #[test]
    fn test_out_of_range_score_is_an_inference_error() {
        let service = service_with(FixedScorer::new(1.5), None);
        assert!(matches!(service.predict("good"), Err(ServiceError::Inference(_))));
    }

    #[test]
    fn test_unavailable_before_initialize() {
        let service = InferenceService::new(Arc::new(MemoryBlobStore::new()));
        assert_eq!(service.state(), ServiceState::Uninitialized);
        assert!(matches!(service.health(), Err(ServiceError::Unavailable(_))));
        assert!(matches!(service.predict("good"), Err(ServiceError::Unavailable(_))));
    }

    #[test]
    fn test_empty_store_fails_initialize() {
        let service = InferenceService::new(Arc::new(MemoryBlobStore::new()));
        assert_eq!(service.initialize(), ServiceState::Failed);
        assert!(matches!(service.health(), Err(ServiceError::Unavailable(_))));
        assert!(matches!(service.metrics(), Err(ServiceError::Unavailable(_))));
    }

    #[test]
    fn test_mismatched_pair_fails_initialize() {
        let store = Arc::new(MemoryBlobStore::new());
        store_pair(&store, "run-a", "run-b");
        let service = InferenceService::new(store);
        assert_eq!(service.initialize(), ServiceState::Failed);
    }

    #[test]
    fn test_missing_metrics_still_becomes_ready() {
        let store = Arc::new(MemoryBlobStore::new());
        store_pair(&store, "run-a", "run-a");
        let service = InferenceService::new(store);

        assert_eq!(service.initialize(), ServiceState::Ready);
        assert_eq!(service.health().unwrap(), HealthStatus::ok());
        assert!(matches!(service.metrics(), Err(ServiceError::NotFound(_))));

        let result = service.predict("good product").unwrap();
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_initialize_runs_once() {
        let store = Arc::new(MemoryBlobStore::new());
        let service = InferenceService::new(store.clone());
        assert_eq!(service.initialize(), ServiceState::Failed);

        store_pair(&store, "run-a", "run-a");
        assert_eq!(service.initialize(), ServiceState::Failed);
    }

    #[test]
    fn test_metrics_are_served_when_loaded() {
        let store = Arc::new(MemoryBlobStore::new());
        store_pair(&store, "run-a", "run-a");
        let report = MetricsReport::new(0.2, &[1, 0], &[1, 0]);
        store.put_blob(METRICS_KEY, &encode_report(&report).unwrap()).unwrap();

        let service = InferenceService::new(store);
        service.initialize();
        assert_eq!(service.metrics().unwrap().global_score.accuracy, 1.0);
    }

    #[test]
    fn test_reload_swaps_the_whole_pair() {
        let store = Arc::new(MemoryBlobStore::new());
        store_pair(&store, "run-a", "run-a");
        let service = InferenceService::new(store.clone());
        service.initialize();
        assert_eq!(service.pair_id().as_deref(), Some("run-a"));

        store_pair(&store, "run-b", "run-b");
        assert_eq!(service.reload().unwrap(), "run-b");
        assert_eq!(service.pair_id().as_deref(), Some("run-b"));
    }

    #[test]
    fn test_failed_reload_keeps_serving_the_old_pair() {
        let store = Arc::new(MemoryBlobStore::new());
        store_pair(&store, "run-a", "run-a");
        let service = InferenceService::new(store.clone());
        service.initialize();

        store_pair(&store, "run-b", "run-c");
        assert!(service.reload().is_err());
        assert_eq!(service.state(), ServiceState::Ready);
        assert_eq!(service.pair_id().as_deref(), Some("run-a"));
    }
}
