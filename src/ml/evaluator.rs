// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs a model over a dataset without gradients and collects
// what the metrics need: the mean loss, the true labels and the
// thresholded predictions.
//
// Used twice per training run:
//   - after every epoch, on the validation slice
//   - once at the end, on the held-out test split
//
// The loss is averaged per review, not per batch, so a short
// final batch does not count as much as a full one.

use anyhow::{anyhow, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    prelude::*,
};

use crate::data::{batcher::ReviewBatcher, dataset::ReviewDataset};
use crate::domain::metrics_report::MetricsReport;
use crate::domain::prediction::Label;
use crate::ml::model::SentimentModel;

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub loss:   f64,
    pub y_true: Vec<u8>,
    pub y_pred: Vec<u8>,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        if self.y_true.is_empty() {
            return 0.0;
        }
        let correct = self.y_true.iter().zip(&self.y_pred).filter(|(t, p)| t == p).count();
        correct as f64 / self.y_true.len() as f64
    }

    pub fn into_report(self) -> MetricsReport {
        MetricsReport::new(self.loss, &self.y_true, &self.y_pred)
    }
}

pub fn evaluate<B: Backend>(
    model:      &SentimentModel<B>,
    dataset:    ReviewDataset,
    batch_size: usize,
    device:     &B::Device,
) -> Result<Evaluation> {
    let loader = DataLoaderBuilder::new(ReviewBatcher::<B>::new(device.clone()))
        .batch_size(batch_size)
        .build(dataset);

    let mut loss_sum = 0.0f64;
    let mut y_true   = Vec::new();
    let mut y_pred   = Vec::new();

    for batch in loader.iter() {
        let [n] = batch.targets.dims();

        let (loss, logits) = model.forward_loss(batch.input_ids, batch.targets.clone());
        loss_sum += loss.into_scalar().elem::<f64>() * n as f64;

        let probs: Vec<f32> = burn::tensor::activation::sigmoid(logits)
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| anyhow!("Cannot read predictions: {e:?}"))?;
        let labels: Vec<i64> = batch.targets
            .into_data()
            .convert::<i64>()
            .to_vec()
            .map_err(|e| anyhow!("Cannot read labels: {e:?}"))?;

        y_pred.extend(probs.iter().map(|&p| (Label::from_score(p as f64) == Label::Positive) as u8));
        y_true.extend(labels.iter().map(|&l| l as u8));
    }

    let loss = if y_true.is_empty() { f64::NAN } else { loss_sum / y_true.len() as f64 };
    Ok(Evaluation { loss, y_true, y_pred })
}
