// ============================================================
// Layer 5 — BiLSTM Sentiment Model
// ============================================================
// Architecture (one review in, one logit out):
//
//   input_ids [B, S]
//       │  Embedding(vocab, 32)
//       ▼
//   [B, S, 32]
//       │  BiLSTM(64), full sequence
//       ▼
//   [B, S, 128]
//       │  BiLSTM(16), final states only
//       ▼
//   [B, 32]     ← forward pass at t=S-1 ++ backward pass at t=0
//       │  Linear(64) + ReLU, Dropout(0.5)
//       ▼
//   [B, 64]
//       │  Linear(1)
//       ▼
//   logits [B, 1]   → sigmoid gives P(positive)
//
// The model returns logits rather than probabilities so the
// loss can use the numerically stable with-logits form.
//
// Reference: Hochreiter & Schmidhuber (1997) LSTM
//            Burn Book §3 (Building Blocks)

use burn::{
    nn::{
        loss::BinaryCrossEntropyLossConfig,
        BiLstm, BiLstmConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SentimentModelConfig {
    pub vocab_size: usize,
    #[config(default = 32)]
    pub embedding_dim: usize,
    #[config(default = 64)]
    pub sequence_hidden: usize,
    #[config(default = 16)]
    pub summary_hidden: usize,
    #[config(default = 64)]
    pub dense_hidden: usize,
    #[config(default = 0.5)]
    pub dropout: f64,
}

impl SentimentModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SentimentModel<B> {
        let embedding      = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        let sequence_lstm  = BiLstmConfig::new(self.embedding_dim, self.sequence_hidden, true).init(device);
        let summary_lstm   = BiLstmConfig::new(2 * self.sequence_hidden, self.summary_hidden, true).init(device);
        let dense          = LinearConfig::new(2 * self.summary_hidden, self.dense_hidden).init(device);
        let dropout        = DropoutConfig::new(self.dropout).init();
        let output         = LinearConfig::new(self.dense_hidden, 1).init(device);
        SentimentModel { embedding, sequence_lstm, summary_lstm, dense, dropout, output }
    }
}

#[derive(Module, Debug)]
pub struct SentimentModel<B: Backend> {
    pub embedding:     Embedding<B>,
    pub sequence_lstm: BiLstm<B>,
    pub summary_lstm:  BiLstm<B>,
    pub dense:         Linear<B>,
    pub dropout:       Dropout,
    pub output:        Linear<B>,
}

impl<B: Backend> SentimentModel<B> {
    /// input_ids: [batch, seq_len] → logits: [batch, 1]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let x = self.embedding.forward(input_ids);
        let (x, _) = self.sequence_lstm.forward(x, None);
        let (x, _) = self.summary_lstm.forward(x, None); // [batch, seq_len, 2 * summary_hidden]

        // Keep only the final state of each direction: the forward
        // half at the last step, the backward half at the first.
        let [batch_size, seq_len, width] = x.dims();
        let half = width / 2;
        let forward_last = x.clone()
            .slice([0..batch_size, seq_len - 1..seq_len, 0..half])
            .reshape([batch_size, half]);
        let backward_first = x
            .slice([0..batch_size, 0..1, half..width])
            .reshape([batch_size, half]);
        let summary = Tensor::cat(vec![forward_last, backward_first], 1);

        let x = relu(self.dense.forward(summary));
        let x = self.dropout.forward(x);
        self.output.forward(x)
    }

    /// P(positive) per review — shape [batch].
    pub fn predict_proba(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        let logits = self.forward(input_ids);
        let [batch_size, _] = logits.dims();
        sigmoid(logits).reshape([batch_size])
    }

    /// Mean binary cross-entropy over the batch, plus the logits
    /// reshaped to [batch].
    pub fn forward_loss(
        &self,
        input_ids: Tensor<B, 2, Int>,
        targets:   Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let logits = self.forward(input_ids);
        let [batch_size, _] = logits.dims();
        let logits = logits.reshape([batch_size]);

        let bce = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device());
        let loss = bce.forward(logits.clone(), targets);
        (loss, logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn tiny_config() -> SentimentModelConfig {
        SentimentModelConfig::new(20)
            .with_embedding_dim(4)
            .with_sequence_hidden(3)
            .with_summary_hidden(2)
            .with_dense_hidden(5)
    }

    #[test]
    fn test_forward_shapes() {
        let device = Default::default();
        let model  = tiny_config().init::<TestBackend>(&device);
        let ids    = Tensor::<TestBackend, 2, Int>::zeros([3, 7], &device);
        assert_eq!(model.forward(ids.clone()).dims(), [3, 1]);

        let probs: Vec<f32> = model.predict_proba(ids).into_data().to_vec().unwrap();
        assert_eq!(probs.len(), 3);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_loss_is_a_finite_scalar() {
        let device  = Default::default();
        let model   = tiny_config().init::<TestBackend>(&device);
        let ids     = Tensor::<TestBackend, 2, Int>::ones([2, 5], &device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([1, 0], &device);
        let (loss, logits) = model.forward_loss(ids, targets);
        assert_eq!(logits.dims(), [2]);
        let loss: f32 = loss.into_scalar().elem();
        assert!(loss.is_finite() && loss > 0.0);
    }

    #[test]
    fn test_default_architecture() {
        let cfg = SentimentModelConfig::new(10_000);
        assert_eq!(cfg.embedding_dim, 32);
        assert_eq!(cfg.sequence_hidden, 64);
        assert_eq!(cfg.summary_hidden, 16);
        assert_eq!(cfg.dense_hidden, 64);
        assert_eq!(cfg.dropout, 0.5);
    }
}
