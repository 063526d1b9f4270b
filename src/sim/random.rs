//! Seeded random ranges for every stochastic generator
//!
//! Gameplay and cosmetic effects draw from separate streams so that toggling
//! particles never changes where obstacles spawn.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Stream offset for the cosmetic generator
const FX_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic source of bounded uniform values
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Generator for cosmetic effects derived from the same run seed
    pub fn fx(seed: u64) -> Self {
        Self::new(seed ^ FX_STREAM)
    }

    /// Uniform value in `[0, 1)`
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform float in `[min, max)`; returns `min` for an empty range
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.unit() * (max - min)
    }

    /// Uniform float within a `(min, max)` tuple
    #[inline]
    pub fn range_of(&mut self, (min, max): (f32, f32)) -> f32 {
        self.range(min, max)
    }

    /// Uniform angle in `[0, 2π)`
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.unit() * std::f32::consts::TAU
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        self.rng.random_bool(p.min(1.0))
    }

    /// Uniform index into a collection of `len` items
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}
