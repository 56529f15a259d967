//! Deterministic simulation-level RNG wrapper.
//!
//! # Determinism strategy
//!
//! A run draws every random number — arrival counts and every customer move —
//! from one `SimRng` seeded with `SimConfig::seed`.  The tick loop is strictly
//! sequential and visits customers in insertion order, so the same seed, the
//! same models and the same configuration always consume the stream in the
//! same order and produce byte-identical logs.

use rand::distributions::Distribution;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// The single random source of a simulation run.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Draw one value from any `rand` distribution.
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        self.0.sample(dist)
    }

    /// Choose a uniformly random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}
