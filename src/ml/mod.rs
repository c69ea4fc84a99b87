// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn-specific training code lives here.
//
//   model.rs     — QcModel trait and the QCNet architecture
//                  (per-item embedding net, item sum, fitting net)
//
//   schedule.rs  — Step-decay learning rate
//
//   evaluator.rs — MSE of a model on one sample
//
//   trainer.rs   — The epoch loop: forward, loss, backward,
//                  Adam step, logging, checkpointing
//
//   backend.rs   — Device selection (NdArray f64 / Wgpu)

/// Device selection and backend aliases
pub mod backend;

/// QcModel trait and QCNet architecture
pub mod model;

/// Step-decay learning rate schedule
pub mod schedule;

/// Loss and logging-time evaluation
pub mod evaluator;

/// The training loop driver
pub mod trainer;
