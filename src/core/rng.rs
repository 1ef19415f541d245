//! Deterministic random number generation for game instances.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Forkable**: Create independent branches when a game is forked
//! - **Named streams**: Independent sequences for shop draws, matchmaking,
//!   combat seeds and so on, so adding a draw in one subsystem never shifts
//!   the sequence seen by another
//!
//! ```
//! use rust_autobattler::core::GameRng;
//!
//! let root = GameRng::new(42);
//! let mut shop_a = root.stream("shop");
//! let mut shop_b = GameRng::new(42).stream("shop");
//!
//! assert_eq!(shop_a.gen_range_usize(0..100), shop_b.gen_range_usize(0..100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

const FORK_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(FORK_MIX));
        Self::new(fork_seed)
    }

    /// Derive an independent named stream from this generator's seed.
    ///
    /// The derivation depends only on the seed and the label, never on how
    /// far this generator has advanced.
    #[must_use]
    pub fn stream(&self, label: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        label.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Draw a fresh 64-bit seed, e.g. for a pure function that takes a seed.
    pub fn next_seed(&mut self) -> u64 {
        self.inner.gen()
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a uniform float in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Generate a random boolean with given probability of true.
    ///
    /// The probability is clamped into `[0, 1]`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose an index with probability proportional to a float weight.
    ///
    /// Weights do not need to sum to 1.0. Returns `None` if the weights are
    /// empty or none of them is positive.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.gen_unit() * total;
        let mut last_positive = None;

        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            last_positive = Some(i);
            if threshold < weight {
                return Some(i);
            }
            threshold -= weight;
        }

        // Floating point edge case - fall back to the last positive weight
        last_positive
    }

    /// Choose an index with probability proportional to an integer count.
    ///
    /// Exact (no floating point): used to sample one physical copy out of a
    /// bag of copies.
    pub fn choose_by_count(&mut self, counts: &[u32]) -> Option<usize> {
        let total: u64 = counts.iter().map(|&c| u64::from(c)).sum();
        if total == 0 {
            return None;
        }

        let mut ticket = self.inner.gen_range(0..total);
        for (i, &count) in counts.iter().enumerate() {
            let count = u64::from(count);
            if ticket < count {
                return Some(i);
            }
            ticket -= count;
        }
        None
    }

    /// Pick `k` distinct indices out of `0..n`, in draw order.
    pub fn sample_distinct(&mut self, n: usize, k: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        let k = k.min(n);
        for i in 0..k {
            let j = self.inner.gen_range(i..n);
            indices.swap(i, j);
        }
        indices.truncate(k);
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_streams_are_independent_of_progress() {
        let mut advanced = GameRng::new(7);
        for _ in 0..50 {
            advanced.next_seed();
        }
        let fresh = GameRng::new(7);

        let mut a = advanced.stream("combat");
        let mut b = fresh.stream("combat");
        assert_eq!(a.next_seed(), b.next_seed());

        let mut shop = fresh.stream("shop");
        let mut combat = fresh.stream("combat");
        assert_ne!(shop.next_seed(), combat.next_seed());
    }

    #[test]
    fn test_fork_produces_different_sequence() {
        let mut rng = GameRng::new(42);
        let mut forked = rng.fork();

        let seq1: Vec<_> = (0..10).map(|_| rng.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| forked.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = GameRng::new(42);

        let weights = [0.0, 100.0, 0.0];
        for _ in 0..20 {
            assert_eq!(rng.choose_weighted(&weights), Some(1));
        }

        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_choose_by_count_skips_empty_bins() {
        let mut rng = GameRng::new(3);
        let counts = [0, 5, 0, 2];

        for _ in 0..50 {
            let picked = rng.choose_by_count(&counts).unwrap();
            assert!(picked == 1 || picked == 3);
        }
        assert_eq!(rng.choose_by_count(&[0, 0]), None);
    }

    #[test]
    fn test_sample_distinct() {
        let mut rng = GameRng::new(11);
        let picked = rng.sample_distinct(10, 3);

        assert_eq!(picked.len(), 3);
        assert_ne!(picked[0], picked[1]);
        assert_ne!(picked[1], picked[2]);
        assert_ne!(picked[0], picked[2]);
        assert_eq!(rng.sample_distinct(2, 5).len(), 2);
    }
}
