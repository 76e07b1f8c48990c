//! Barrier-crossing Monte Carlo engine.
//!
//! Simulates a path ensemble under a chosen stochastic model and reports
//! the fraction of paths on which the spot touches the barrier at least
//! once before expiry. Calls monitor the running maximum against an upper
//! barrier; puts monitor the running minimum against a lower barrier. The
//! seeded first column is excluded from the scan, so a barrier set at the
//! spot itself does not trigger trivially.
//!
//! The companion [`BarrierMonteCarloEngine::trigger_statistics`] mode
//! reruns the same seeded lognormal construction and returns the per-path
//! extreme values instead of a crossing indicator, for hosts that want the
//! full distribution of how close paths come to the barrier.

use engine_core::{EngineError, MarketParams, OptionType};
use engine_models::{ModelSpec, SimulationInputs, DEFAULT_SEED};

/// Cap on per-hour time discretisation to bound memory on long maturities.
const MAX_STEPS: usize = 100_000;

/// Maturity substituted for non-positive inputs: one calendar day.
const MIN_MATURITY: f64 = 1.0 / 365.0;

/// Configuration for the barrier Monte Carlo engine.
///
/// Built with struct-update or the `with_*` helpers, validated once at
/// engine construction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierEngineConfig {
    /// Number of simulated paths.
    pub n_paths: usize,
    /// Maximum number of full paths retained for inspection or plotting.
    pub sample_cap: usize,
    /// Base RNG seed; simulations with equal config and inputs are
    /// bit-reproducible.
    pub seed: u64,
}

impl Default for BarrierEngineConfig {
    fn default() -> Self {
        Self {
            n_paths: 1000,
            sample_cap: 50,
            seed: DEFAULT_SEED,
        }
    }
}

impl BarrierEngineConfig {
    /// Sets the path count.
    pub fn with_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = n_paths;
        self
    }

    /// Sets the retained-sample cap.
    pub fn with_sample_cap(mut self, sample_cap: usize) -> Self {
        self.sample_cap = sample_cap;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.n_paths == 0 {
            return Err(EngineError::InvalidConfig {
                name: "n_paths",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of one barrier simulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierSimulation {
    /// Fraction of paths that touched the barrier, in `[0, 1]`.
    pub probability: f64,
    /// Mean terminal price across all paths.
    pub mean_terminal: f64,
    /// Population standard deviation of terminal prices.
    pub std_terminal: f64,
    /// Terminal price of every path.
    pub terminal_prices: Vec<f64>,
    /// Up to `sample_cap` full paths, for plotting.
    pub sample_paths: Vec<Vec<f64>>,
    /// Uniform time grid shared by every path, in years.
    pub time_grid: Vec<f64>,
}

/// Per-path barrier-side extremes from the trigger-statistics mode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerStats {
    /// Mean of the per-path extremes.
    pub mean: f64,
    /// Population standard deviation of the per-path extremes.
    pub std: f64,
    /// One extreme per path: the running maximum for calls, the running
    /// minimum for puts.
    pub values: Vec<f64>,
}

/// Monte Carlo engine for barrier-touch probability estimation.
pub struct BarrierMonteCarloEngine {
    config: BarrierEngineConfig,
}

impl BarrierMonteCarloEngine {
    /// Creates an engine from a validated configuration.
    pub fn new(config: BarrierEngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine configuration.
    pub fn config(&self) -> &BarrierEngineConfig {
        &self.config
    }

    /// Repairs degenerate market inputs in place of rejecting them: expired
    /// maturities become one day, negative volatilities become zero.
    fn repair(market: &MarketParams) -> (f64, f64) {
        let maturity = if market.maturity <= 0.0 {
            tracing::warn!(
                maturity = market.maturity,
                "non-positive maturity, substituting one day"
            );
            MIN_MATURITY
        } else {
            market.maturity
        };
        let volatility = if market.volatility < 0.0 {
            tracing::warn!(
                volatility = market.volatility,
                "negative volatility clamped to 0"
            );
            0.0
        } else {
            market.volatility
        };
        (maturity, volatility)
    }

    /// Hourly step count for a maturity, clamped to `[1, 100_000]`.
    fn step_count(maturity: f64) -> usize {
        ((maturity * 365.0 * 24.0) as usize).clamp(1, MAX_STEPS)
    }

    /// Estimates the probability that the spot touches the barrier before
    /// expiry under the given model.
    pub fn simulate_barrier(
        &self,
        market: &MarketParams,
        model: &ModelSpec,
    ) -> BarrierSimulation {
        let (maturity, volatility) = Self::repair(market);
        let n_steps = Self::step_count(maturity);
        tracing::debug!(
            model = model.name(),
            n_steps,
            n_paths = self.config.n_paths,
            "running barrier simulation"
        );

        let inputs = SimulationInputs {
            spot: market.spot,
            rate: market.rate,
            volatility,
            maturity,
        };
        let ensemble = model.simulate(&inputs, n_steps, self.config.n_paths, self.config.seed);

        let mut touched = 0usize;
        for p in 0..ensemble.n_paths() {
            let path = ensemble.path(p);
            let hit = match market.option_type {
                // Skip the seed column: the barrier is only live after t0.
                OptionType::Call => path[1..]
                    .iter()
                    .fold(f64::NEG_INFINITY, |m, &x| m.max(x))
                    >= market.barrier,
                OptionType::Put => {
                    path[1..].iter().fold(f64::INFINITY, |m, &x| m.min(x)) <= market.barrier
                }
            };
            if hit {
                touched += 1;
            }
        }

        let terminal_prices = ensemble.terminal_prices();
        let (mean_terminal, std_terminal) = population_moments(&terminal_prices);

        BarrierSimulation {
            probability: touched as f64 / ensemble.n_paths() as f64,
            mean_terminal,
            std_terminal,
            sample_paths: ensemble.sample_paths(self.config.sample_cap),
            terminal_prices,
            time_grid: ensemble.time_grid().to_vec(),
        }
    }

    /// Collects the per-path barrier-side extremes under the lognormal
    /// model, using the same seed and discretisation as
    /// [`simulate_barrier`](Self::simulate_barrier) so both views describe
    /// the same ensemble.
    pub fn trigger_statistics(&self, market: &MarketParams) -> TriggerStats {
        let (maturity, volatility) = Self::repair(market);
        let n_steps = Self::step_count(maturity);

        let inputs = SimulationInputs {
            spot: market.spot,
            rate: market.rate,
            volatility,
            maturity,
        };
        let ensemble =
            ModelSpec::Lognormal.simulate(&inputs, n_steps, self.config.n_paths, self.config.seed);

        let values: Vec<f64> = (0..ensemble.n_paths())
            .map(|p| {
                let path = ensemble.path(p);
                match market.option_type {
                    OptionType::Call => {
                        path[1..].iter().fold(f64::NEG_INFINITY, |m, &x| m.max(x))
                    }
                    OptionType::Put => path[1..].iter().fold(f64::INFINITY, |m, &x| m.min(x)),
                }
            })
            .collect();

        let (mean, std) = population_moments(&values);
        TriggerStats { mean, std, values }
    }
}

/// Population mean and standard deviation; `(NaN, NaN)` on an empty slice.
fn population_moments(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn market(option_type: OptionType, barrier: f64) -> MarketParams {
        MarketParams {
            spot: 100.0,
            strike: 100.0,
            barrier,
            maturity: 30.0 / 365.0,
            rate: 0.05,
            volatility: 0.25,
            option_type,
        }
    }

    fn engine(n_paths: usize) -> BarrierMonteCarloEngine {
        BarrierMonteCarloEngine::new(BarrierEngineConfig::default().with_paths(n_paths))
            .expect("valid config")
    }

    #[test]
    fn test_zero_paths_rejected() {
        let result = BarrierMonteCarloEngine::new(BarrierEngineConfig::default().with_paths(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_probability_in_unit_interval() {
        let sim = engine(200).simulate_barrier(&market(OptionType::Call, 105.0), &ModelSpec::Lognormal);
        assert!((0.0..=1.0).contains(&sim.probability));
        assert_eq!(sim.terminal_prices.len(), 200);
    }

    #[test]
    fn test_barrier_at_zero_always_hit_for_put() {
        // Lognormal paths stay positive, so a put barrier at any level above
        // zero and below every path minimum is never hit, and a call barrier
        // below spot is hit immediately after t0.
        let sim = engine(100).simulate_barrier(&market(OptionType::Put, 1e-9), &ModelSpec::Lognormal);
        assert_eq!(sim.probability, 0.0);

        let sim = engine(100).simulate_barrier(&market(OptionType::Call, 1e-9), &ModelSpec::Lognormal);
        assert_eq!(sim.probability, 1.0);
    }

    #[test]
    fn test_probability_monotone_in_volatility() {
        // A 10% OTM upper barrier over one month: more volatility, more
        // touches. Wide path counts keep the MC noise below the effect.
        let mut low = market(OptionType::Call, 110.0);
        low.volatility = 0.15;
        let mut high = low;
        high.volatility = 0.45;

        let eng = engine(4000);
        let p_low = eng.simulate_barrier(&low, &ModelSpec::Lognormal).probability;
        let p_high = eng.simulate_barrier(&high, &ModelSpec::Lognormal).probability;
        assert!(
            p_high > p_low,
            "expected monotone touch probability, got {p_low} vs {p_high}"
        );
    }

    #[test]
    fn test_deterministic_given_seed() {
        let mkt = market(OptionType::Call, 108.0);
        let a = engine(500).simulate_barrier(&mkt, &ModelSpec::Lognormal);
        let b = engine(500).simulate_barrier(&mkt, &ModelSpec::Lognormal);
        assert_eq!(a.probability, b.probability);
        assert_eq!(a.terminal_prices, b.terminal_prices);
    }

    #[test]
    fn test_seed_changes_result() {
        let mkt = market(OptionType::Call, 108.0);
        let a = engine(500).simulate_barrier(&mkt, &ModelSpec::Lognormal);
        let b = BarrierMonteCarloEngine::new(
            BarrierEngineConfig::default().with_paths(500).with_seed(7),
        )
        .expect("valid config")
        .simulate_barrier(&mkt, &ModelSpec::Lognormal);
        assert_ne!(a.terminal_prices, b.terminal_prices);
    }

    #[test]
    fn test_sample_cap_limits_retained_paths() {
        let eng = BarrierMonteCarloEngine::new(
            BarrierEngineConfig::default().with_paths(200).with_sample_cap(10),
        )
        .expect("valid config");
        let sim = eng.simulate_barrier(&market(OptionType::Call, 110.0), &ModelSpec::Lognormal);
        assert_eq!(sim.sample_paths.len(), 10);
        // Every retained path shares the grid length.
        for path in &sim.sample_paths {
            assert_eq!(path.len(), sim.time_grid.len());
        }
    }

    #[test]
    fn test_expired_maturity_repaired_to_one_day() {
        let mut mkt = market(OptionType::Call, 110.0);
        mkt.maturity = 0.0;
        let sim = engine(50).simulate_barrier(&mkt, &ModelSpec::Lognormal);
        // One day at 24 hourly steps: 25 grid points including the seed.
        assert_eq!(sim.time_grid.len(), 25);
        assert_relative_eq!(
            *sim.time_grid.last().expect("non-empty grid"),
            1.0 / 365.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_trigger_statistics_bound_by_barrier_outcome() {
        // For a call, paths that hit the barrier must show a running max at
        // or above it; the trigger view must agree with the crossing view.
        let mkt = market(OptionType::Call, 106.0);
        let eng = engine(800);
        let sim = eng.simulate_barrier(&mkt, &ModelSpec::Lognormal);
        let stats = eng.trigger_statistics(&mkt);
        assert_eq!(stats.values.len(), 800);
        let hit_fraction = stats
            .values
            .iter()
            .filter(|&&m| m >= mkt.barrier)
            .count() as f64
            / 800.0;
        assert_relative_eq!(hit_fraction, sim.probability, epsilon = 1e-12);
    }

    #[test]
    fn test_trigger_statistics_put_minima_below_spot() {
        let stats = engine(300).trigger_statistics(&market(OptionType::Put, 95.0));
        // Running minima can never exceed the seeded spot's first step by
        // much; the mean minimum sits below spot for any positive vol.
        assert!(stats.mean < 100.0 * 1.01);
        assert!(stats.std > 0.0);
    }
}
