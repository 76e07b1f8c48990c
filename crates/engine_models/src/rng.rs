//! Seeded random number generation for path simulation.
//!
//! Wraps a [`StdRng`] behind a small interface so every simulator draws
//! shocks the same way and reseeding stays explicit.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Poisson, StandardNormal};

/// Simulation random number generator.
///
/// Same seed, same sequence: each simulate call constructs its own `SimRng`
/// from the caller-supplied seed, which is what makes path ensembles
/// bit-reproducible.
///
/// # Examples
///
/// ```
/// use engine_models::SimRng;
///
/// let mut a = SimRng::from_seed(42);
/// let mut b = SimRng::from_seed(42);
/// assert_eq!(a.gen_normal(), b.gen_normal());
/// ```
pub struct SimRng {
    inner: StdRng,
    seed: u64,
}

impl SimRng {
    /// Creates a generator initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a single standard normal variate.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Fills a buffer with standard normal variates.
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }

    /// Draws a Poisson count with the given mean.
    ///
    /// A non-positive or non-finite mean yields 0, matching the
    /// "no jumps this step" interpretation rather than failing.
    #[inline]
    pub fn gen_poisson(&mut self, mean: f64) -> u64 {
        if !(mean > 0.0) || !mean.is_finite() {
            return 0;
        }
        match Poisson::new(mean) {
            Ok(dist) => dist.sample(&mut self.inner) as u64,
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimRng::from_seed(7);
        let mut b = SimRng::from_seed(7);
        for _ in 0..100 {
            assert_eq!(a.gen_normal(), b.gen_normal());
        }
    }

    #[test]
    fn test_different_seed_diverges() {
        let mut a = SimRng::from_seed(1);
        let mut b = SimRng::from_seed(2);
        let same = (0..10).all(|_| a.gen_normal() == b.gen_normal());
        assert!(!same);
    }

    #[test]
    fn test_fill_normal_matches_single_draws() {
        let mut a = SimRng::from_seed(99);
        let mut b = SimRng::from_seed(99);
        let mut buffer = [0.0; 16];
        a.fill_normal(&mut buffer);
        for value in buffer {
            assert_eq!(value, b.gen_normal());
        }
    }

    #[test]
    fn test_poisson_degenerate_mean() {
        let mut rng = SimRng::from_seed(1);
        assert_eq!(rng.gen_poisson(0.0), 0);
        assert_eq!(rng.gen_poisson(-1.0), 0);
        assert_eq!(rng.gen_poisson(f64::NAN), 0);
    }

    #[test]
    fn test_poisson_mean_scales_counts() {
        let mut rng = SimRng::from_seed(5);
        let total: u64 = (0..2000).map(|_| rng.gen_poisson(3.0)).sum();
        let mean = total as f64 / 2000.0;
        assert!((mean - 3.0).abs() < 0.2);
    }
}
