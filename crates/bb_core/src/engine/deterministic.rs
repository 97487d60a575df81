//! Seed derivation for reproducible runs.
//!
//! Every trial gets its own ChaCha stream: same `(base_seed, trial_index)`
//! → same random sequence, regardless of which worker thread runs it or how
//! trials are split into batches.
//!
//! ```
//! use bb_core::engine::deterministic::trial_rng;
//! use rand::Rng;
//!
//! let a: u64 = trial_rng(7, 3).gen();
//! let b: u64 = trial_rng(7, 3).gen();
//! assert_eq!(a, b);
//! ```

// FxHasher, not DefaultHasher: DefaultHasher output is not stable across Rust versions.
use fxhash::FxHasher;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

// ============================================================================
// Per-trial streams
// ============================================================================

/// RNG for trial `trial_index` of a run seeded with `base_seed`.
pub fn trial_rng(base_seed: u64, trial_index: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    rng.set_stream(trial_index);
    rng
}

/// Factory form of [`trial_rng`] for the aggregator.
pub fn seeded_factory(base_seed: u64) -> impl Fn(u64) -> ChaCha8Rng + Sync + Send + Copy {
    move |trial_index| trial_rng(base_seed, trial_index)
}

// ============================================================================
// Derived seeds
// ============================================================================

/// Stable sub-seed for a named unit of work (e.g. one game id in a slate).
pub fn derive_seed(base_seed: u64, key: &str) -> u64 {
    let mut hasher = FxHasher::default();
    base_seed.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

/// Seed for an unseeded run, taken from OS entropy.
pub fn entropy_seed() -> u64 {
    rand::random()
}
