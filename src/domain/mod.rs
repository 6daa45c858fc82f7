// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define what the
// system talks about: reviews, predictions, metrics reports,
// error kinds and the seams between layers.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O or network calls
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Typed error kinds for storage and serving
pub mod error;

// Raw and cleaned labelled reviews
pub mod review;

// Label, threshold and prediction result
pub mod prediction;

// Evaluation report stored after each training run
pub mod metrics_report;

// Core abstractions (traits) that other layers implement
pub mod traits;
