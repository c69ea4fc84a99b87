// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the loop and the use cases:
//
//   checkpoint.rs — Model weights via Burn's NamedMpkGzFileRecorder,
//                   plus JSON sidecars: the epoch marker, the
//                   TrainConfig and the QcNetConfig, so `eval`
//                   can rebuild the exact model and data split.
//
//   metrics.rs    — The progress table printed to stdout and
//                   the optional per-row CSV log.

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Progress table and CSV metrics logger
pub mod metrics;
