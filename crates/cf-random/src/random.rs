//! Deterministic random number generation.
//!
//! Uses a seeded PRNG (Xoshiro256**) that produces identical sequences
//! for identical seeds, so any candidate can be regenerated from its seed.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Deterministic random number generator.
///
/// Wraps Xoshiro256** with a seed for reproducibility.
/// Given the same seed, always produces the same sequence.
///
/// # Example
///
/// ```rust
/// use cf_random::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// let a: u64 = rng.gen();
/// let b: u64 = rng.gen();
///
/// let mut rng2 = DeterministicRng::new(12345);
/// assert_eq!(rng2.gen::<u64>(), a);
/// assert_eq!(rng2.gen::<u64>(), b);
/// ```
pub struct DeterministicRng {
    rng: Xoshiro256StarStar,
    calls_count: u64,
}

impl DeterministicRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        debug_assert!(seed != 0, "Seed should not be zero for better randomness");

        Self {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            calls_count: 0,
        }
    }

    /// RNG for one task of a run, see [`task_seed`].
    #[must_use]
    pub fn for_task(master_seed: u64, task_id: u64) -> Self {
        Self::new(task_seed(master_seed, task_id))
    }

    /// Get number of random values generated.
    #[must_use]
    pub fn calls_count(&self) -> u64 {
        self.calls_count
    }

    /// Generate a random value of type T.
    pub fn gen<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.calls_count += 1;
        self.rng.gen()
    }

    /// Generate a random value in the given range.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.calls_count += 1;
        self.rng.gen_range(range)
    }
}

/// Derive the seed for `task_id` from a run's master seed.
///
/// SplitMix64 finalizer over `master ^ (task_id * golden ratio)`: adjacent
/// task ids land far apart. Never returns zero.
#[must_use]
pub fn task_seed(master_seed: u64, task_id: u64) -> u64 {
    let mut z = master_seed ^ task_id.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    if z == 0 {
        1
    } else {
        z
    }
}
