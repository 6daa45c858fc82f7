// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and Adam,
// with early stopping on validation loss.
//
// Key Burn insight:
//   - Training uses MyBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on MyInnerBackend (NdArray)
//     with dropout switched off
//   - Validation batches are built on MyInnerBackend too
//
// Early stopping keeps a copy of the weights from the best epoch
// (lowest validation loss) and returns that copy, not the
// weights from the last epoch that ran.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::ReviewBatcher, dataset::ReviewDataset};
use crate::infra::metrics::{EarlyStopping, EpochMetrics, EpochOutcome};
use crate::ml::evaluator::evaluate;
use crate::ml::model::{SentimentModel, SentimentModelConfig};

pub type MyBackend      = burn::backend::Autodiff<burn::backend::NdArray>;
pub type MyInnerBackend = burn::backend::NdArray;

/// The model kept at the end of training, ready for evaluation
/// and export.
pub struct TrainedModel {
    pub model:   SentimentModel<MyInnerBackend>,
    pub history: Vec<EpochMetrics>,
}

pub fn run_training(
    cfg:           &TrainConfig,
    model_cfg:     &SentimentModelConfig,
    train_dataset: ReviewDataset,
    val_dataset:   ReviewDataset,
) -> Result<TrainedModel> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    tracing::info!("Using NdArray device: {:?}", device);
    MyBackend::seed(cfg.seed);
    train_loop(cfg, model_cfg, train_dataset, val_dataset, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    model_cfg:     &SentimentModelConfig,
    train_dataset: ReviewDataset,
    val_dataset:   ReviewDataset,
    device:        burn::backend::ndarray::NdArrayDevice,
) -> Result<TrainedModel> {

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: SentimentModel<MyBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: vocab={}, embedding={}, lstm={}/{}",
        model_cfg.vocab_size, model_cfg.embedding_dim,
        model_cfg.sequence_hidden, model_cfg.summary_hidden,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = ReviewBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    let has_validation = val_dataset.sample_count() > 0;
    if !has_validation {
        tracing::warn!("Validation slice is empty, early stopping will watch training loss");
    }

    let mut early      = EarlyStopping::new(cfg.patience);
    let mut best_model = None;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.input_ids, batch.targets);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.learning_rate, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        let (val_loss, val_accuracy) = if has_validation {
            let eval = evaluate(
                &model_valid,
                val_dataset.clone(),
                cfg.batch_size,
                &device,
            )?;
            (eval.loss, eval.accuracy())
        } else {
            (avg_train_loss, f64::NAN)
        };

        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs, avg_train_loss, val_loss, val_accuracy * 100.0,
        );

        match early.observe(EpochMetrics::new(epoch, avg_train_loss, val_loss, val_accuracy)) {
            EpochOutcome::Improved => best_model = Some(model_valid),
            EpochOutcome::Stalled  => {}
            EpochOutcome::Stop     => {
                tracing::info!("Early stopping after epoch {} (patience {})", epoch, cfg.patience);
                break;
            }
        }
    }

    if let Some(best) = early.best() {
        tracing::info!("Restoring weights from epoch {} (val_loss={:.4})", best.epoch, best.val_loss);
    }
    let model = best_model.unwrap_or_else(|| model.valid());

    tracing::info!("Training complete!");
    Ok(TrainedModel { model, history: early.history().to_vec() })
}
