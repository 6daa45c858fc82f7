// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   blob_store.rs      — The artifact store gateway
//                        Local-directory and in-memory buckets,
//                        plus a wrapper that bounds every call
//                        with a timeout. Also the well-known
//                        blob keys.
//
//   checkpoint.rs      — Model artifact codec
//                        Packs the model config and Burn weights
//                        (BinBytesRecorder) into one blob.
//
//   tokenizer_store.rs — Vocabulary fitting and persistence
//                        Builds the WordLevel tokenizer on the
//                        training split and (de)serialises it
//                        with its pair id.
//
//   metrics.rs         — Training metrics
//                        Epoch history, early stopping and the
//                        evaluation report blob codec.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Blob store implementations and keys
pub mod blob_store;

/// Model artifact encoding and decoding
pub mod checkpoint;

/// Tokenizer fitting, saving, and loading
pub mod tokenizer_store;

/// Epoch metrics, early stopping, report codec
pub mod metrics;
