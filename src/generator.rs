//! Random lowercase sequence generation.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::traits::SequenceSource;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Draws each character uniformly from `a..=z`.
#[derive(Debug, Clone)]
pub struct RandomLowercase<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomLowercase<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomLowercase<StdRng> {
    /// Reproducible source: the same seed yields the same sequence stream.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> SequenceSource for RandomLowercase<R> {
    fn next_sequence(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| {
                let idx = self.rng.gen_range(0..ALPHABET.len());
                ALPHABET[idx] as char
            })
            .collect()
    }
}
