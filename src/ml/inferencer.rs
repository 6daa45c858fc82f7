// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Wraps a trained SentimentModel behind the Scorer trait: one
// padded id sequence in, P(positive) out.
//
// Burn modules hold their parameters in lazily initialised cells
// that are Send but not Sync, so one model value cannot serve two
// threads at once. Each forward pass checks a model out of an idle
// pool and returns it afterwards; an empty pool clones the loaded
// template. Clones share the underlying weight tensors, so the pool
// grows to the peak number of concurrent requests without copying
// the weights.

use anyhow::{anyhow, Result};
use burn::prelude::*;
use std::sync::Mutex;

use crate::domain::traits::Scorer;
use crate::infra::checkpoint::{decode_model, ArtifactHeader};
use crate::ml::model::SentimentModel;

type InferBackend = burn::backend::NdArray;

type Model = SentimentModel<InferBackend>;

pub struct BurnScorer {
    template: Mutex<Model>,
    idle:     Mutex<Vec<Model>>,
    header:   ArtifactHeader,
    device:   burn::backend::ndarray::NdArrayDevice,
}

impl BurnScorer {
    /// Rebuild the model from a model artifact blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let (header, model) = decode_model::<InferBackend>(bytes, &device)?;
        tracing::info!(
            "Model loaded: pair_id={}, vocab_size={}",
            header.pair_id,
            header.vocab_size
        );
        Ok(Self {
            template: Mutex::new(model),
            idle:     Mutex::new(Vec::new()),
            header,
            device,
        })
    }

    pub fn header(&self) -> &ArtifactHeader {
        &self.header
    }

    fn checkout(&self) -> Result<Model> {
        let pooled = self.idle.lock().map_err(|_| anyhow!("Model pool poisoned"))?.pop();
        match pooled {
            Some(model) => Ok(model),
            None => {
                let template = self.template.lock().map_err(|_| anyhow!("Model lock poisoned"))?;
                Ok(template.clone())
            }
        }
    }

    fn checkin(&self, model: Model) {
        if let Ok(mut idle) = self.idle.lock() {
            idle.push(model);
        }
    }

    /// Models waiting in the pool.
    fn idle_count(&self) -> usize {
        self.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }
}

impl Scorer for BurnScorer {
    fn score(&self, sequence: &[u32]) -> Result<f64> {
        let vocab = self.header.vocab_size as u32;
        if let Some(&bad) = sequence.iter().find(|&&id| id >= vocab) {
            return Err(anyhow!("Token id {} outside vocabulary of {}", bad, vocab));
        }

        let ids: Vec<i32> = sequence.iter().map(|&x| x as i32).collect();
        let input = Tensor::<InferBackend, 1, Int>::from_ints(ids.as_slice(), &self.device)
            .unsqueeze::<2>();

        let model  = self.checkout()?;
        let output = model.predict_proba(input);
        self.checkin(model);

        let probs: Vec<f32> = output
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| anyhow!("Cannot read model output: {e:?}"))?;

        probs
            .first()
            .map(|&p| p as f64)
            .ok_or_else(|| anyhow!("Model returned no score"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sequence::pad_post;
    use crate::infra::checkpoint::encode_model;
    use crate::ml::model::SentimentModelConfig;

    fn scorer() -> BurnScorer {
        let device = Default::default();
        let cfg    = SentimentModelConfig::new(8)
            .with_embedding_dim(4)
            .with_sequence_hidden(3)
            .with_summary_hidden(2)
            .with_dense_hidden(4);
        let model  = cfg.init::<InferBackend>(&device);
        let header = ArtifactHeader { pair_id: "p".into(), vocab_size: 8, model: cfg };
        BurnScorer::from_bytes(&encode_model(model, &header).unwrap()).unwrap()
    }

    #[test]
    fn test_score_is_a_probability_and_deterministic() {
        let scorer = scorer();
        let seq    = pad_post(vec![2, 5, 7], 16);
        let a = scorer.score(&seq).unwrap();
        let b = scorer.score(&seq).unwrap();
        assert!((0.0..=1.0).contains(&a));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_ids_outside_the_vocabulary() {
        assert!(scorer().score(&[2, 8]).is_err());
    }

    #[test]
    fn test_concurrent_scores_match_and_models_are_reused() {
        let scorer   = scorer();
        let seq      = pad_post(vec![3, 4, 6], 16);
        let expected = scorer.score(&seq).unwrap();
        assert_eq!(scorer.idle_count(), 1);

        let scores: Vec<f64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| scorer.score(&seq).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(scores.iter().all(|&p| p == expected));
        let pooled = scorer.idle_count();
        assert!((1..=4).contains(&pooled));
    }
}
