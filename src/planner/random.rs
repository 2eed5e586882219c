use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the uniform draws used by recipe selection.
pub trait RandomSource {
    /// A uniformly distributed index in `0..upper`. `upper` is never zero.
    fn next_index(&mut self, upper: usize) -> usize;
}

/// [`RandomSource`] backed by a `StdRng`.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible draws for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}

/// Replays a fixed sequence of draws, wrapping each into range and cycling
/// once exhausted. An empty sequence always draws `0`.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    draws: Vec<usize>,
    position: usize,
}

impl SequenceSource {
    pub fn new(draws: Vec<usize>) -> Self {
        Self { draws, position: 0 }
    }

    /// Always picks the first candidate.
    pub fn first() -> Self {
        Self::default()
    }
}

impl RandomSource for SequenceSource {
    fn next_index(&mut self, upper: usize) -> usize {
        if self.draws.is_empty() {
            return 0;
        }
        let draw = self.draws[self.position % self.draws.len()];
        self.position += 1;
        draw % upper
    }
}
