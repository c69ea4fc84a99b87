// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one goal each:
//
//   train_use_case.rs — read systems, build QCNet, run the loop
//   eval_use_case.rs  — restore a checkpoint and report its RMSE
//
// Rules for this layer:
//   - No ML math or model code here
//   - No progress printing here (the loop and Layer 1 do that)
//   - Only workflow coordination and backend dispatch

// The training workflow
pub mod train_use_case;

// Checkpoint evaluation workflow
pub mod eval_use_case;
