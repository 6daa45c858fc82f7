// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run, start to finish:
//
//   Step 1: Load the cleaned corpus     (Layer 6 blob store, Layer 4 loader)
//   Step 2: Stratified 80/20 split      (Layer 4 - data)
//   Step 3: Fit a fresh tokenizer       (Layer 6 - infra)
//   Step 4: Encode and pad both splits  (Layer 4 - data)
//   Step 5: Hold out validation slice   (Layer 4 - data)
//   Step 6: Run training loop           (Layer 5 - ml)
//   Step 7: Persist model + tokenizer   (Layer 6 - infra)
//   Step 8: Evaluate on the test split  (Layer 5 - ml)
//   Step 9: Persist the metrics report  (Layer 6 - infra)
//
// Any failure aborts the remaining steps and is returned to the
// caller. The serving process is never touched from here; it
// picks the new pair up by reloading once this returns Ok.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::data::{
    dataset::{ReviewDataset, ReviewSample},
    loader::parse_labeled_corpus,
    sequence::{pad_post, SEQUENCE_LEN},
    splitter::{split_tail, stratified_split, SPLIT_SEED, TEST_FRACTION},
};
use crate::domain::{
    metrics_report::MetricsReport,
    review::LabeledReview,
    traits::BlobStore,
};
use crate::infra::{
    blob_store::{CLEANED_CORPUS_KEY, METRICS_KEY, MODEL_KEY, TOKENIZER_KEY},
    checkpoint::{encode_model, ArtifactHeader},
    metrics::encode_report,
    tokenizer_store::{VocabTokenizer, MAX_VOCAB_IDS},
};
use crate::ml::{
    evaluator::evaluate,
    model::SentimentModelConfig,
    trainer::run_training,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub max_vocab_ids:       usize,
    pub test_fraction:       f64,
    pub validation_fraction: f64,
    pub seed:                u64,
    pub epochs:              usize,
    pub batch_size:          usize,
    pub learning_rate:       f64,
    pub patience:            usize,
    pub embedding_dim:       usize,
    pub sequence_hidden:     usize,
    pub summary_hidden:      usize,
    pub dense_hidden:        usize,
    pub dropout:             f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_vocab_ids:       MAX_VOCAB_IDS,
            test_fraction:       TEST_FRACTION,
            validation_fraction: 0.1,
            seed:                SPLIT_SEED,
            epochs:              20,
            batch_size:          32,
            learning_rate:       1e-3,
            patience:            2,
            embedding_dim:       32,
            sequence_hidden:     64,
            summary_hidden:      16,
            dense_hidden:        64,
            dropout:             0.5,
        }
    }
}

impl TrainConfig {
    /// Model architecture for a vocabulary of `vocab_size` ids.
    pub fn model_config(&self, vocab_size: usize) -> SentimentModelConfig {
        SentimentModelConfig::new(vocab_size)
            .with_embedding_dim(self.embedding_dim)
            .with_sequence_hidden(self.sequence_hidden)
            .with_summary_hidden(self.summary_hidden)
            .with_dense_hidden(self.dense_hidden)
            .with_dropout(self.dropout)
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub pair_id:    String,
    pub vocab_size: usize,
    pub epochs_run: usize,
    pub report:     MetricsReport,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    store:  Arc<dyn BlobStore>,
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(store: Arc<dyn BlobStore>, config: TrainConfig) -> Self {
        Self { store, config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Load the cleaned corpus ──────────────────────────────────
        tracing::info!("Loading cleaned corpus from '{}'", CLEANED_CORPUS_KEY);
        let bytes = self.store
            .get_blob(CLEANED_CORPUS_KEY)
            .context("Cannot load cleaned corpus")?;
        let reviews = parse_labeled_corpus(&bytes)?;
        if reviews.is_empty() {
            bail!("Cleaned corpus is empty, nothing to train on");
        }
        tracing::info!("Loaded {} labelled reviews", reviews.len());

        // ── Step 2: Stratified train/test split ──────────────────────────────
        let (train_reviews, test_reviews) =
            stratified_split(reviews, cfg.test_fraction, cfg.seed, |r: &LabeledReview| r.label);
        if train_reviews.is_empty() || test_reviews.is_empty() {
            bail!(
                "Corpus too small to split: {} train, {} test reviews",
                train_reviews.len(),
                test_reviews.len()
            );
        }
        tracing::info!(
            "Split: {} train, {} test",
            train_reviews.len(),
            test_reviews.len()
        );

        // ── Step 3: Fit tokenizer on training text only ───────────────────────
        let pair_id   = new_pair_id();
        let texts: Vec<String> = train_reviews.iter().map(|r| r.content.clone()).collect();
        let tokenizer = VocabTokenizer::fit(&texts, cfg.max_vocab_ids, pair_id.clone())?;

        // ── Step 4: Encode and pad both splits ────────────────────────────────
        let train_samples = encode_split(&tokenizer, &train_reviews, "train")?;
        let test_samples  = encode_split(&tokenizer, &test_reviews, "test")?;

        // ── Step 5: Last slice of the training split validates ────────────────
        let (fit_samples, val_samples) = split_tail(train_samples, cfg.validation_fraction);
        if fit_samples.is_empty() {
            bail!("No training samples left after holding out validation");
        }
        tracing::info!(
            "Training on {} samples, validating on {}",
            fit_samples.len(),
            val_samples.len()
        );

        // ── Step 6: Run training loop (Layer 5) ───────────────────────────────
        let model_cfg = cfg.model_config(tokenizer.vocab_size());
        let trained   = run_training(
            cfg,
            &model_cfg,
            ReviewDataset::new(fit_samples),
            ReviewDataset::new(val_samples),
        )?;
        let epochs_run = trained.history.len();

        // ── Step 7: Persist the matched pair ──────────────────────────────────
        let header = ArtifactHeader {
            pair_id:    pair_id.clone(),
            vocab_size: tokenizer.vocab_size(),
            model:      model_cfg,
        };
        let model_bytes = encode_model(trained.model.clone(), &header)?;
        self.store
            .put_blob(MODEL_KEY, &model_bytes)
            .context("Cannot store model artifact")?;
        self.store
            .put_blob(TOKENIZER_KEY, &tokenizer.to_bytes()?)
            .context("Cannot store tokenizer artifact")?;
        tracing::info!("Stored artifact pair '{}'", pair_id);

        // ── Step 8: Evaluate on the held-out test split ───────────────────────
        let device     = burn::backend::ndarray::NdArrayDevice::default();
        let evaluation = evaluate(
            &trained.model,
            ReviewDataset::new(test_samples),
            cfg.batch_size,
            &device,
        )?;
        let report = evaluation.into_report();
        tracing::info!(
            "Test results: loss={:.4} accuracy={:.3} precision={:.3} recall={:.3}",
            report.global_score.loss,
            report.global_score.accuracy,
            report.global_score.precision,
            report.global_score.recall,
        );

        // ── Step 9: Persist the metrics report ────────────────────────────────
        self.store
            .put_blob(METRICS_KEY, &encode_report(&report)?)
            .context("Cannot store metrics report")?;

        Ok(TrainSummary {
            pair_id,
            vocab_size: tokenizer.vocab_size(),
            epochs_run,
            report,
        })
    }
}

/// Identifier shared by the model and tokenizer of one run.
fn new_pair_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("run-{}-{:08x}", secs, rand::thread_rng().gen::<u32>())
}

/// Turn reviews into fixed-length samples. Unknown words are
/// dropped and counted once for the whole split.
fn encode_split(
    tokenizer: &VocabTokenizer,
    reviews:   &[LabeledReview],
    split:     &str,
) -> Result<Vec<ReviewSample>> {
    let mut dropped = 0usize;
    let mut samples = Vec::with_capacity(reviews.len());
    for review in reviews {
        let (ids, unknown) = tokenizer.encode_counting(&review.content)?;
        dropped += unknown;
        samples.push(ReviewSample::new(pad_post(ids, SEQUENCE_LEN), review.label));
    }
    if dropped > 0 {
        tracing::warn!("Dropped {} out-of-vocabulary tokens from the {} split", dropped, split);
    }
    Ok(samples)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::to_jsonl;
    use crate::infra::{
        blob_store::MemoryBlobStore,
        checkpoint::decode_header,
        metrics::decode_report,
    };

    fn tiny_config() -> TrainConfig {
        TrainConfig {
            epochs:          2,
            batch_size:      4,
            embedding_dim:   4,
            sequence_hidden: 3,
            summary_hidden:  2,
            dense_hidden:    4,
            ..TrainConfig::default()
        }
    }

    fn seeded_store() -> Arc<MemoryBlobStore> {
        let mut reviews = Vec::new();
        for i in 0..10 {
            reviews.push(LabeledReview::new(format!("great love product {}", i), 1));
            reviews.push(LabeledReview::new(format!("terrible broke refund {}", i), 0));
        }
        let store = Arc::new(MemoryBlobStore::new());
        store.put_blob(CLEANED_CORPUS_KEY, &to_jsonl(&reviews).unwrap()).unwrap();
        store
    }

    #[test]
    fn test_default_config_matches_documented_hyperparameters() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.max_vocab_ids, 10_000);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.epochs, 20);
        assert_eq!(cfg.patience, 2);
        assert_eq!(cfg.learning_rate, 1e-3);

        let model = cfg.model_config(500);
        assert_eq!(model.vocab_size, 500);
        assert_eq!(model.embedding_dim, 32);
        assert_eq!(model.sequence_hidden, 64);
        assert_eq!(model.summary_hidden, 16);
    }

    #[test]
    fn test_pair_ids_differ_between_runs() {
        assert_ne!(new_pair_id(), new_pair_id());
    }

    #[test]
    fn test_execute_writes_a_matched_pair_and_report() {
        let store   = seeded_store();
        let summary = TrainUseCase::new(store.clone(), tiny_config()).execute().unwrap();

        assert!(summary.epochs_run >= 1 && summary.epochs_run <= 2);

        let model_blob  = store.get_blob(MODEL_KEY).unwrap();
        let (header, _) = decode_header(&model_blob).unwrap();
        let tokenizer   = VocabTokenizer::from_bytes(&store.get_blob(TOKENIZER_KEY).unwrap()).unwrap();
        assert_eq!(header.pair_id, summary.pair_id);
        assert_eq!(tokenizer.pair_id(), summary.pair_id);
        assert_eq!(header.vocab_size, tokenizer.vocab_size());

        let report = decode_report(&store.get_blob(METRICS_KEY).unwrap()).unwrap();
        // 20 reviews, 20% held out per class
        assert_eq!(report.classification_report.macro_avg.support, 4);
        assert!((report.global_score.accuracy - summary.report.global_score.accuracy).abs() < 1e-9);
    }

    #[test]
    fn test_execute_fails_without_a_corpus() {
        let store = Arc::new(MemoryBlobStore::new());
        assert!(TrainUseCase::new(store.clone(), tiny_config()).execute().is_err());
        assert!(!store.contains(MODEL_KEY));
    }

    #[test]
    fn test_corpus_too_small_for_a_test_split_stores_nothing() {
        // Two reviews per class: 20% of each rounds to zero
        let reviews = vec![
            LabeledReview::new("great love", 1),
            LabeledReview::new("love product", 1),
            LabeledReview::new("terrible broke", 0),
            LabeledReview::new("broke refund", 0),
        ];
        let store = Arc::new(MemoryBlobStore::new());
        store.put_blob(CLEANED_CORPUS_KEY, &to_jsonl(&reviews).unwrap()).unwrap();

        assert!(TrainUseCase::new(store.clone(), tiny_config()).execute().is_err());
        assert!(!store.contains(MODEL_KEY));
        assert!(!store.contains(TOKENIZER_KEY));
        assert!(!store.contains(METRICS_KEY));
    }

    #[test]
    fn test_execute_fails_on_an_empty_corpus() {
        let store = Arc::new(MemoryBlobStore::new());
        store.put_blob(CLEANED_CORPUS_KEY, b"").unwrap();
        assert!(TrainUseCase::new(store.clone(), tiny_config()).execute().is_err());
        assert!(!store.contains(TOKENIZER_KEY));
    }
}
