// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (preparing data, training, or serving
// predictions).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No HTTP or printing here (that's Layer 1)
//   - Blob access only through the BlobStore trait
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Raw corpus → cleaned corpus
pub mod prepare_use_case;

// The training and evaluation workflow
pub mod train_use_case;

// The serving state machine and loaded artifact pair
pub mod inference_service;

// Out-of-band training runs triggered over HTTP
pub mod background_trainer;
