//! Uniform random sources for dataset generation
//!
//! The generator only needs values in [0, 1). Production draws from the
//! operating system's entropy source and drops to a PRNG if that source
//! ever fails. Reproducible runs and tests plug in the sources from
//! [`crate::deterministic`].

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use tracing::warn;

/// Provider of uniformly distributed values in `[0.0, 1.0)`.
pub trait UniformSource {
    /// Next value in `[0.0, 1.0)`.
    fn next_unit(&mut self) -> f64;
}

impl<T: UniformSource + ?Sized> UniformSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<T: UniformSource + ?Sized> UniformSource for Box<T> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Map 64 random bits onto `[0.0, 1.0)` using the top 53 bits.
pub(crate) fn unit_from_bits(bits: u64) -> f64 {
    const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
    (bits >> 11) as f64 * SCALE
}

/// OS entropy with a standard PRNG fallback.
#[derive(Debug)]
pub struct EntropySource {
    fallback: Option<StdRng>,
}

impl EntropySource {
    pub fn new() -> Self {
        Self { fallback: None }
    }

    /// Whether the source has switched to the PRNG fallback.
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn fallback_rng(&mut self) -> &mut StdRng {
        self.fallback.get_or_insert_with(|| {
            let seed = chrono::Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_default() as u64;
            StdRng::seed_from_u64(seed)
        })
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformSource for EntropySource {
    fn next_unit(&mut self) -> f64 {
        if self.fallback.is_none() {
            let mut buf = [0u8; 8];
            match OsRng.try_fill_bytes(&mut buf) {
                Ok(()) => return unit_from_bits(u64::from_le_bytes(buf)),
                Err(err) => {
                    warn!("OS entropy unavailable ({}), falling back to StdRng", err);
                }
            }
        }
        self.fallback_rng().gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_from_bits_bounds() {
        assert_eq!(unit_from_bits(0), 0.0);
        let top = unit_from_bits(u64::MAX);
        assert!(top < 1.0);
        assert!(top > 0.999_999);
    }

    #[test]
    fn test_entropy_source_range() {
        let mut source = EntropySource::new();
        for _ in 0..1000 {
            let u = source.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_boxed_source_forwarding() {
        fn draw<S: UniformSource>(mut source: S) -> f64 {
            source.next_unit()
        }

        let mut boxed: Box<dyn UniformSource> = Box::new(EntropySource::new());
        let u = draw(&mut boxed);
        assert!((0.0..1.0).contains(&u));
    }
}
