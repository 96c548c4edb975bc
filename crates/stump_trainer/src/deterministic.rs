//! Deterministic utilities for reproducible runs
//!
//! Provides an LCG-based uniform source for seeded generation, a
//! fixed-sequence source for tests, and the tie-breaking key used when two
//! split candidates reach the same impurity.

use std::num::Wrapping;

use crate::random::UniformSource;

/// Linear Congruential Generator for deterministic pseudo-randomness
/// Uses constants from Numerical Recipes (glibc)
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<i64>,
}

impl LcgRng {
    // LCG constants (compatible with glibc)
    const MULTIPLIER: i64 = 1103515245;
    const INCREMENT: i64 = 12345;
    const MODULUS: i64 = 1 << 31;

    pub fn new(seed: u64) -> Self {
        Self {
            state: Wrapping((seed % Self::MODULUS as u64) as i64),
        }
    }

    /// Generate next random i64 in range [0, MODULUS)
    pub fn next_i64(&mut self) -> i64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        self.state.0 & (Self::MODULUS - 1)
    }
}

impl UniformSource for LcgRng {
    fn next_unit(&mut self) -> f64 {
        self.next_i64() as f64 / Self::MODULUS as f64
    }
}

/// Replays a fixed list of uniforms, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    /// Values are clamped into `[0.0, 1.0)`. An empty list yields `0.0` forever.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of values consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for FixedSequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Deterministic tie-breaker for split selection
/// Orders candidates by (feature_idx, position): the earliest boundary wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SplitTieBreaker {
    pub feature_idx: usize,
    pub position: usize,
}

impl SplitTieBreaker {
    pub fn new(feature_idx: usize, position: usize) -> Self {
        Self {
            feature_idx,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_determinism() {
        let mut rng1 = LcgRng::new(42);
        let mut rng2 = LcgRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_i64(), rng2.next_i64());
        }
    }

    #[test]
    fn test_lcg_unit_range() {
        let mut rng = LcgRng::new(42);
        for _ in 0..1000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_lcg_different_seeds() {
        let mut rng1 = LcgRng::new(1);
        let mut rng2 = LcgRng::new(2);
        assert_ne!(rng1.next_i64(), rng2.next_i64());
    }

    #[test]
    fn test_fixed_sequence_cycles() {
        let mut seq = FixedSequence::new(vec![0.1, 0.2]);
        assert_eq!(seq.next_unit(), 0.1);
        assert_eq!(seq.next_unit(), 0.2);
        assert_eq!(seq.next_unit(), 0.1);
        assert_eq!(seq.consumed(), 3);
    }

    #[test]
    fn test_fixed_sequence_clamps() {
        let mut seq = FixedSequence::new(vec![-1.0, 2.0]);
        assert_eq!(seq.next_unit(), 0.0);
        assert!(seq.next_unit() < 1.0);

        let mut empty = FixedSequence::new(Vec::new());
        assert_eq!(empty.next_unit(), 0.0);
    }

    #[test]
    fn test_tie_breaker_ordering() {
        let t1 = SplitTieBreaker::new(0, 3);
        let t2 = SplitTieBreaker::new(0, 4);
        let t3 = SplitTieBreaker::new(1, 0);

        assert!(t1 < t2);
        assert!(t2 < t3);
    }
}
