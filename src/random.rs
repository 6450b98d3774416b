//! Seeded random generator handed to appliers.
//!
//! One generator is created per run from the configured seed and shared by
//! every case in declared order, so the same seed always yields the same files.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct Random {
    rng: ChaCha8Rng,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[min, max]`. Panics if `min > max`.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        self.rng.gen_range(min..=max)
    }

    /// Uniform integer in `[min, max]`. Panics if `min > max`.
    pub fn next_long(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    /// Uniform real in `[min, max)`.
    pub fn next_double(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    pub fn shuffle<T>(&mut self, values: &mut [T]) {
        values.shuffle(&mut self.rng);
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0)
    }
}
