// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn model, its training loop and
// the forward pass used at serving time.
//
// What's in this layer:
//
//   model.rs      — The BiLSTM sentiment classifier
//                   • Word embeddings
//                   • Two stacked bidirectional LSTMs
//                   • Dense + dropout head with one logit
//
//   trainer.rs    — The training loop
//                   Forward pass, binary cross-entropy, backward
//                   pass, Adam step, early stopping with best
//                   weights restored
//
//   evaluator.rs  — Loss and thresholded predictions over a
//                   dataset, used for validation and the final
//                   test report
//
//   inferencer.rs — BurnScorer: the trained model behind the
//                   Scorer trait
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Hochreiter & Schmidhuber (1997) LSTM

/// BiLSTM sentiment model architecture
pub mod model;

/// Training loop with validation and early stopping
pub mod trainer;

/// Loss and predictions over a whole dataset
pub mod evaluator;

/// Serving-time forward pass behind the Scorer trait
pub mod inferencer;
