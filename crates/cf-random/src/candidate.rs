//! Candidate generation.

use cf_core::Charset;

use crate::random::DeterministicRng;

/// Draws candidates of a fixed size from a charset.
///
/// Every byte is an independent uniform draw over the charset entries.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    charset: Charset,
    size: usize,
}

impl CandidateGenerator {
    pub fn new(charset: Charset, size: usize) -> Self {
        Self { charset, size }
    }

    /// Generate one candidate of exactly `size` bytes.
    pub fn generate(&self, rng: &mut DeterministicRng) -> String {
        let bytes = self.charset.as_bytes();
        let candidate: String = (0..self.size)
            .map(|_| char::from(bytes[rng.gen_range(0..bytes.len())]))
            .collect();

        debug_assert_eq!(candidate.len(), self.size);
        candidate
    }
}
