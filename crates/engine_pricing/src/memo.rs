//! Memoizing wrapper around the binomial lattice pricer.
//!
//! Keys are the bit patterns of the full input tuple, so a cached price is
//! a pure function of its key and identical inputs always return the
//! identical value. The cache is mutex-guarded: the engine itself is
//! single-threaded, but a host parallelising surface cells across workers
//! only risks recomputing a value, never reading a wrong one.
//!
//! Callers bumping parameters in sequence (the Greek estimator) must call
//! [`LatticePricer::clear`] first.

use std::sync::Mutex;

use engine_core::{BoundedCache, ExerciseStyle, OptionType};

use crate::lattice::{binomial_price, LatticeRequest};

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Exact-tuple cache key: every float is compared by bit pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct LatticeKey {
    spot: u64,
    strike: u64,
    maturity: u64,
    rate: u64,
    volatility: u64,
    n_steps: usize,
    option_type: OptionType,
    style: ExerciseStyle,
}

impl From<&LatticeRequest> for LatticeKey {
    fn from(req: &LatticeRequest) -> Self {
        Self {
            spot: req.spot.to_bits(),
            strike: req.strike.to_bits(),
            maturity: req.maturity.to_bits(),
            rate: req.rate.to_bits(),
            volatility: req.volatility.to_bits(),
            n_steps: req.n_steps,
            option_type: req.option_type,
            style: req.style,
        }
    }
}

/// Binomial lattice pricer with a bounded LRU memoization cache.
///
/// # Examples
///
/// ```
/// use engine_core::{ExerciseStyle, OptionType};
/// use engine_pricing::{LatticePricer, LatticeRequest};
///
/// let pricer = LatticePricer::new();
/// let req = LatticeRequest {
///     spot: 100.0,
///     strike: 100.0,
///     maturity: 1.0,
///     rate: 0.04,
///     volatility: 0.25,
///     n_steps: 200,
///     option_type: OptionType::Call,
///     style: ExerciseStyle::European,
/// };
///
/// let first = pricer.price(&req);
/// let second = pricer.price(&req); // served from cache
/// assert_eq!(first, second);
/// assert_eq!(pricer.hits(), 1);
/// ```
pub struct LatticePricer {
    cache: Mutex<BoundedCache<LatticeKey, f64>>,
}

impl LatticePricer {
    /// Creates a pricer with the default capacity of 128 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a pricer with an explicit cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(BoundedCache::new(capacity)),
        }
    }

    /// Prices a request, consulting the cache first.
    ///
    /// NaN sentinels are cached like any other value: recomputing a known
    /// degenerate input would only reproduce the same sentinel.
    pub fn price(&self, req: &LatticeRequest) -> f64 {
        let key = LatticeKey::from(req);
        {
            let mut cache = self.cache.lock().expect("lattice cache lock poisoned");
            if let Some(value) = cache.get(&key) {
                return value;
            }
        }

        // Compute outside the lock so concurrent callers are not serialised
        // behind an O(N^2) tree fold.
        let value = binomial_price(req);

        let mut cache = self.cache.lock().expect("lattice cache lock poisoned");
        cache.insert(key, value);
        value
    }

    /// Drops every cached entry.
    ///
    /// Required before any bumped-parameter sequence so that finite
    /// differences are never served stale values.
    pub fn clear(&self) {
        tracing::debug!("clearing lattice memoization cache");
        self.cache
            .lock()
            .expect("lattice cache lock poisoned")
            .clear();
    }

    /// Number of cached prices.
    pub fn len(&self) -> usize {
        self.cache.lock().expect("lattice cache lock poisoned").len()
    }

    /// Returns true when the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lifetime cache hits, exposed for cache-correctness tests.
    pub fn hits(&self) -> u64 {
        self.cache
            .lock()
            .expect("lattice cache lock poisoned")
            .hits()
    }

    /// Lifetime cache misses.
    pub fn misses(&self) -> u64 {
        self.cache
            .lock()
            .expect("lattice cache lock poisoned")
            .misses()
    }
}

impl Default for LatticePricer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LatticeRequest {
        LatticeRequest {
            spot: 100.0,
            strike: 100.0,
            maturity: 1.0,
            rate: 0.05,
            volatility: 0.2,
            n_steps: 100,
            option_type: OptionType::Call,
            style: ExerciseStyle::American,
        }
    }

    #[test]
    fn test_repeat_request_hits_cache() {
        let pricer = LatticePricer::new();
        let a = pricer.price(&request());
        let b = pricer.price(&request());
        assert_eq!(a, b);
        assert_eq!(pricer.hits(), 1);
        assert_eq!(pricer.misses(), 1);
        assert_eq!(pricer.len(), 1);
    }

    #[test]
    fn test_each_key_component_is_significant() {
        let pricer = LatticePricer::new();
        let base = request();
        pricer.price(&base);

        let variants = [
            LatticeRequest { spot: 101.0, ..base },
            LatticeRequest { strike: 99.0, ..base },
            LatticeRequest { maturity: 0.9, ..base },
            LatticeRequest { rate: 0.04, ..base },
            LatticeRequest { volatility: 0.25, ..base },
            LatticeRequest { n_steps: 101, ..base },
            LatticeRequest {
                option_type: OptionType::Put,
                ..base
            },
            LatticeRequest {
                style: ExerciseStyle::European,
                ..base
            },
        ];
        for variant in &variants {
            pricer.price(variant);
        }
        // Base plus eight one-field variants: nine independent entries.
        assert_eq!(pricer.len(), 9);
        assert_eq!(pricer.hits(), 0);
    }

    #[test]
    fn test_clear_forces_recompute() {
        let pricer = LatticePricer::new();
        pricer.price(&request());
        pricer.clear();
        assert!(pricer.is_empty());
        pricer.price(&request());
        assert_eq!(pricer.hits(), 0);
        assert_eq!(pricer.misses(), 2);
    }

    #[test]
    fn test_nan_sentinel_is_cached() {
        let pricer = LatticePricer::new();
        let mut req = request();
        req.n_steps = 0;
        assert!(pricer.price(&req).is_nan());
        assert!(pricer.price(&req).is_nan());
        assert_eq!(pricer.hits(), 1);
    }

    #[test]
    fn test_eviction_respects_capacity() {
        let pricer = LatticePricer::with_capacity(4);
        for i in 0..10 {
            let req = LatticeRequest {
                strike: 90.0 + i as f64,
                ..request()
            };
            pricer.price(&req);
        }
        assert_eq!(pricer.len(), 4);
    }
}
