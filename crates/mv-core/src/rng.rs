//! Seeded random sources.
//!
//! A run has a single seed.  [`UserRng`] mixes it with a user id, so every
//! draw a user makes depends on `(seed, user)` alone and a trajectory comes
//! out the same whether users are simulated in order, on a thread pool, or
//! one at a time.  [`SimRng`] is the run-level stream for single-threaded
//! setup such as synthetic population generation.

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::distributions::{Distribution, Standard};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::UserId;

/// 2^64 / φ; odd, so multiplication scatters consecutive ids.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

fn user_seed(run_seed: u64, user: UserId) -> u64 {
    run_seed ^ user.0.wrapping_mul(GOLDEN_GAMMA)
}

// ── UserRng ───────────────────────────────────────────────────────────────────

/// Random stream owned by one user's simulation.
pub struct UserRng(SmallRng);

impl UserRng {
    pub fn new(run_seed: u64, user: UserId) -> Self {
        Self(SmallRng::seed_from_u64(user_seed(run_seed, user)))
    }

    /// Uniform draw from the `Standard` distribution (`f64` in `[0, 1)`).
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        Standard: Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// Draw from any `rand` distribution (weighted indices, normals, ...).
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(&mut self.0)
    }

    /// Uniformly chosen element; `None` for an empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-level random stream.  Not used inside per-user simulation.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        Standard: Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }
}
