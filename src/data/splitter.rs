// ============================================================
// Layer 4 - Train/Validation Splitter
// ============================================================
// Shuffles samples with an explicitly seeded RNG and splits them
// into a training set (weight updates) and a validation set
// (checkpoint and early-stop decisions).
//
// The seed comes from the training configuration, so a run is
// reproducible end to end; there is no process-wide random state.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` deterministically and split into
/// (train, validation).
///
/// # Arguments
/// * `samples`        - All available samples (consumed)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `seed`           - RNG seed from the training configuration
pub fn split_train_val<T>(
    mut samples: Vec<T>,
    train_fraction: f64,
    seed: u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] and returns them
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        samples.len(),
        val.len(),
    );

    (samples, val)
}
