// Copyright (c) 2024 Mike Tsao

//! Provides the random-number generator that drives every augmentation
//! draw.

use byteorder::{BigEndian, ByteOrder};
use delegate::delegate;

/// A pseudorandom number generator (PRNG) for applications such as data
/// augmentation that don't require cryptographically secure random numbers,
/// but do require reproducibility: every [Transform](crate::augmentation::Transform)
/// draws exclusively from the [Rng] the caller hands it, so a pipeline run
/// is replayable bit-for-bit from a seed.
#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    fn default() -> Self {
        // We want to panic if this fails, because it indicates that a core OS
        // facility isn't functioning.
        Self::new_with_seed(Self::generate_seed().unwrap())
    }
}
#[allow(missing_docs)]
impl Rng {
    /// Pass the same number to [Rng::new_with_seed()] to get the same stream
    /// back again. Good for reproducing test failures.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    /// Create a sufficiently high-quality random number that's suitable for
    /// [Rng].
    pub fn generate_seed() -> anyhow::Result<u128> {
        let mut bytes = [0u8; 16];

        getrandom::getrandom(&mut bytes)?;
        Ok(BigEndian::read_u128(&bytes))
    }

    delegate! {
        to self.0 {
            pub fn rand_u64(&mut self) -> u64;
            pub fn rand_float(&mut self) -> f64;
            pub fn rand_range(&mut self, range: core::ops::Range<u64>) -> u64;
        }
    }

    /// A uniform f64 in `[low, high)`. `low` must not exceed `high`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        debug_assert!(low <= high);
        low + self.rand_float() * (high - low)
    }

    /// A uniform integer in `[low, high]`, inclusive on both ends.
    pub fn rand_int_inclusive(&mut self, low: i32, high: i32) -> i32 {
        debug_assert!(low <= high);
        low + self.rand_range(0..(high - low + 1) as u64) as i32
    }

    /// Draws `k` distinct indices uniformly from `0..n`, without
    /// replacement, via a partial Fisher-Yates shuffle. The result is in
    /// draw order, not sorted. `k` must not exceed `n`.
    pub fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        debug_assert!(k <= n);
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k.min(n) {
            let j = i + self.rand_range(0..(n - i) as u64) as usize;
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool
    }
}
