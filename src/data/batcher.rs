// ============================================================
// Layer 4 — Review Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<ReviewSample>
// into tensors.
//
// How batching works here:
//   Input:  Vec of N ReviewSamples, each with S padded ids
//   Output: ReviewBatch with input_ids [N, S] and targets [N]
//
//   We flatten all input_ids into one long Vec, then reshape:
//   [r1_t1, r1_t2, ..., r1_tS, r2_t1, ..., rN_tS] → [N, S]
//
// Targets stay integer 0 / 1: Burn's binary cross-entropy takes
// Int targets next to the float logits.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ReviewSample;

// ─── ReviewBatch ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct ReviewBatch<B: Backend> {
    /// Token ids — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Labels as 0 / 1 — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── ReviewBatcher ────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created in the right place.
#[derive(Clone, Debug)]
pub struct ReviewBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ReviewBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ReviewSample, ReviewBatch<B>> for ReviewBatcher<B> {
    fn batch(&self, items: Vec<ReviewSample>) -> ReviewBatch<B> {
        let batch_size = items.len();
        // All sequences have the same length (pre-padded)
        let seq_len    = items.first().map(|s| s.input_ids.len()).unwrap_or(0);

        // ── Flatten input_ids ─────────────────────────────────────────────────
        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        // ── Create tensors ────────────────────────────────────────────────────
        let input_ids = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let targets = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        ReviewBatch { input_ids, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let batcher = ReviewBatcher::<NdArray>::new(Default::default());
        let batch   = batcher.batch(vec![
            ReviewSample::new(vec![2, 3, 0, 0], 1),
            ReviewSample::new(vec![4, 0, 0, 0], 0),
            ReviewSample::new(vec![5, 6, 7, 8], 1),
        ]);
        assert_eq!(batch.input_ids.dims(), [3, 4]);
        assert_eq!(batch.targets.dims(), [3]);

        let targets: Vec<i64> = batch.targets.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(targets, vec![1, 0, 1]);
    }
}
