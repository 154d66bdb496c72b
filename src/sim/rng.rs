//! Injectable randomness
//!
//! Games never reach for ambient randomness. Spawns, shuffles and retargets
//! all draw from a `RandomSource` handed in at construction, so a seeded
//! `GameRng` (or a scripted `SequenceRng`) reproduces a run exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform random numbers
pub trait RandomSource {
    /// Uniform in `[0, 1)`
    fn unit(&mut self) -> f32;

    /// Uniform in `[min, max)`
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.unit() * (max - min)
    }

    /// Uniform index in `[0, len)`; 0 for an empty range
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        // f32 rounding can land exactly on `len`
        ((self.unit() * len as f32) as usize).min(len - 1)
    }
}

/// Fisher-Yates shuffle driven by a `RandomSource`
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

/// Seeded PCG32 generator
#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u64,
    inner: Pcg32,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.inner.random_range(0..len)
    }
}

/// Replays a fixed list of unit values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Always returns the same value
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRng {
    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 0.999_999)
    }
}
