// ============================================================
// Layer 4 — Train/Held-out Splitter
// ============================================================
// Randomly shuffles frames and splits them into two sets:
//   - Training set: batched every epoch to update the weights
//   - Held-out set: only used for the logged test error
//
// Frames inside a system are usually time-ordered (an MD
// trajectory), so splitting without a shuffle would hold out
// only the tail of the trajectory.
//
// The RNG is passed in so a fixed seed reproduces the split.

use rand::{seq::SliceRandom, Rng};

/// Shuffle `samples` and split into (train, held_out).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.9 = 90%
/// * `rng`            - Source of randomness for the shuffle
pub fn split_train_val<T, R: Rng + ?Sized>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    // After this: samples = [0..split_at], val = [split_at..total]
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Frame split: {} training, {} held out",
        samples.len(),
        val.len(),
    );

    (samples, val)
}
