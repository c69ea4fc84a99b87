// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The training loop is written against this trait rather than
// a concrete reader, so tests can drive it with tiny in-memory
// stubs and the CLI can drive it with GroupReader.
//
// Every method returns Result: a reader that cannot assemble a
// sample aborts the run, it is never skipped.

use anyhow::Result;

use crate::domain::sample::Sample;

// ─── SampleReader ─────────────────────────────────────────────────────────────
/// A source of training samples.
///
/// Implementations:
///   - GroupReader → grouped systems loaded from JSON on disk
pub trait SampleReader {
    /// One epoch: a finite pass over the training samples.
    /// Calling it again restarts the sequence.
    fn batches(&mut self) -> impl Iterator<Item = Result<Sample>> + '_;

    /// One training batch, used for the epoch-0 train error.
    fn sample_train(&mut self) -> Result<Sample>;

    /// The whole held-out set as a single sample.
    fn sample_all(&mut self) -> Result<Sample>;
}
