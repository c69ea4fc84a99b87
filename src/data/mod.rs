// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from JSON system files on disk to device tensors.
//
//   system dirs
//       │
//       ▼
//   load_system()     → validated, flattened frames
//       │
//       ▼
//   split_train_val() → train / held-out frames per system
//       │
//       ▼
//   GroupReader       → implements SampleReader (host Samples)
//       │
//       ▼
//   SampleBatch       → Burn tensors on the training device

/// Loads and validates one system file
pub mod system;

/// Shuffles and splits frames into train / held-out sets
pub mod splitter;

/// Serves batches and evaluation samples over a group of systems
pub mod reader;

/// Converts host samples into Burn tensors
pub mod batcher;
