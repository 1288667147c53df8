//! # cf-random
//!
//! Seeded candidate generation.
//!
//! Every run has a master seed. Each task derives its own seed from the
//! master seed and its task id, so tasks are independent of which worker
//! runs them and in what order, and a run can be replayed from its seed.
//!
//! ## Reproducibility
//!
//! ```bash
//! CF_SEED=12345 cf-find 4 --tasks 1000
//! ```

pub mod candidate;
pub mod random;

pub use candidate::CandidateGenerator;
pub use random::{task_seed, DeterministicRng};

/// Environment variable holding the master seed.
pub const SEED_ENV_VAR: &str = "CF_SEED";

/// Errors from seed handling.
#[derive(Debug, thiserror::Error)]
pub enum RandomError {
    #[error("CF_SEED must be a valid u64, got {0:?}")]
    InvalidSeed(String),
}

/// Get the master seed from `CF_SEED` or generate a random one.
///
/// The seed is logged so a run can be reproduced.
pub fn seed_from_env_or_random() -> Result<u64, RandomError> {
    match std::env::var(SEED_ENV_VAR) {
        Ok(s) => {
            let seed = parse_seed(&s)?;
            tracing::info!(seed, "{}={} (from environment)", SEED_ENV_VAR, seed);
            Ok(seed)
        }
        Err(_) => {
            let seed = random_seed();
            tracing::info!(seed, "{}={} (randomly generated)", SEED_ENV_VAR, seed);
            Ok(seed)
        }
    }
}

/// Parse a seed given on the command line or in the environment.
pub fn parse_seed(s: &str) -> Result<u64, RandomError> {
    s.trim()
        .parse()
        .map_err(|_| RandomError::InvalidSeed(s.to_string()))
}

/// A fresh non-zero seed from the thread RNG.
pub fn random_seed() -> u64 {
    loop {
        let seed = rand::random::<u64>();
        if seed != 0 {
            return seed;
        }
    }
}
