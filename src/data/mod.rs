// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from a raw review corpus all
// the way to tensor batches.
//
// The pipeline flows in this order:
//
//   JSON Lines corpus
//       │
//       ▼
//   loader            → parses raw / cleaned review records
//       │
//       ▼
//   Normalizer        → lowercase, punctuation, lemmas, stopwords
//       │
//       ▼
//   splitter          → stratified train/test split (seed 42)
//       │
//       ▼
//   VocabTokenizer    → words to ids (infra/tokenizer_store.rs)
//       │
//       ▼
//   sequence          → pad / truncate to 128 ids
//       │
//       ▼
//   ReviewDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   ReviewBatcher     → stacks samples into tensor batches
//
// The Normalizer and sequence steps are shared with serving, so
// a live request is prepared exactly like a training review.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Reads and writes JSON Lines review corpora
pub mod loader;

/// Read-only English word tables
pub mod lexicon;

/// Part-of-speech guess and rule-based lemmas
pub mod lemmatizer;

/// Raw review text → cleaned token string
pub mod normalizer;

/// Pads and truncates id sequences
pub mod sequence;

/// Implements Burn's Dataset trait for encoded reviews
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Stratified train/test and tail validation splits
pub mod splitter;
