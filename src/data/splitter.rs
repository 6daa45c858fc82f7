// ============================================================
// Layer 4 — Stratified Train/Test Splitter
// ============================================================
// Splits labelled samples into a training set and a held-out
// test set while keeping the class balance of the whole corpus
// in both halves.
//
// How the split works:
//   1. Group sample indices by label
//   2. Shuffle each group with a seeded RNG
//   3. Send round(group_len * test_fraction) of each group to
//      the test set, the rest to training
//   4. Shuffle each side once more so labels are interleaved
//
// The same seed over the same corpus gives the same split on
// every run. Training uses seed 42 and a 0.2 test fraction.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom over a
// StdRng seeded from a u64.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::collections::BTreeMap;

pub const SPLIT_SEED: u64 = 42;

pub const TEST_FRACTION: f64 = 0.2;

/// Split `samples` into (train, test), stratified by `label_of`.
pub fn stratified_split<T, F>(
    samples: Vec<T>,
    test_fraction: f64,
    seed: u64,
    label_of: F,
) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> u8,
{
    let mut rng = StdRng::seed_from_u64(seed);

    // ── Group by label ────────────────────────────────────────────────────────
    // BTreeMap keeps label order stable, so the RNG is consumed
    // in the same order on every run
    let mut groups: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (i, sample) in samples.iter().enumerate() {
        groups.entry(label_of(sample)).or_default().push(i);
    }

    // ── Cut each group ────────────────────────────────────────────────────────
    let mut test_idx  = Vec::new();
    let mut train_idx = Vec::new();
    for indices in groups.values_mut() {
        indices.shuffle(&mut rng);
        let n_test = ((indices.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.min(indices.len());
        test_idx.extend_from_slice(&indices[..n_test]);
        train_idx.extend_from_slice(&indices[n_test..]);
    }
    train_idx.shuffle(&mut rng);
    test_idx.shuffle(&mut rng);

    // ── Move samples out by index ─────────────────────────────────────────────
    let total = samples.len();
    let mut slots: Vec<Option<T>> = samples.into_iter().map(Some).collect();
    let mut take  = |idx: Vec<usize>| -> Vec<T> {
        idx.into_iter().filter_map(|i| slots[i].take()).collect()
    };
    let train = take(train_idx);
    let test  = take(test_idx);

    tracing::debug!(
        "Dataset split: {} training, {} test ({}% / {}%)",
        train.len(),
        test.len(),
        (train.len() * 100) / total.max(1),
        (test.len()  * 100) / total.max(1),
    );

    (train, test)
}

/// Cut the last `fraction` of `samples` off as a validation set,
/// without shuffling.
pub fn split_tail<T>(mut samples: Vec<T>, fraction: f64) -> (Vec<T>, Vec<T>) {
    let total    = samples.len();
    let n_tail   = ((total as f64) * fraction).round() as usize;
    let split_at = total - n_tail.min(total);
    let tail     = samples.split_off(split_at);
    (samples, tail)
}
