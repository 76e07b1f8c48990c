//! Merton jump-diffusion path simulation.
//!
//! Adds a compound-Poisson jump term to the lognormal step:
//! ```text
//! count   ~ Poisson(lambda * dt)
//! jumpsum ~ Normal(count * mu_j, sqrt(count) * sigma_j)
//! ```
//! with the drift compensated by `-lambda * (exp(mu_j + 0.5*sigma_j^2) - 1) * dt`
//! so the discounted price stays a martingale.

use engine_core::EngineError;

use crate::ensemble::PathEnsemble;
use crate::model_enum::SimulationInputs;
use crate::rng::SimRng;

/// Merton jump-diffusion parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpDiffusionParams {
    /// Jump intensity (expected jumps per year).
    pub lambda: f64,
    /// Mean of a single jump's log-size.
    pub mu_jump: f64,
    /// Standard deviation of a single jump's log-size.
    pub sigma_jump: f64,
}

impl JumpDiffusionParams {
    /// Creates validated jump parameters.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] when `lambda < 0` or
    /// `sigma_jump < 0`, or when any field is non-finite.
    pub fn new(lambda: f64, mu_jump: f64, sigma_jump: f64) -> Result<Self, EngineError> {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "lambda",
                value: lambda,
                constraint: "must be finite and non-negative",
            });
        }
        if !mu_jump.is_finite() {
            return Err(EngineError::InvalidParameter {
                name: "mu_jump",
                value: mu_jump,
                constraint: "must be finite",
            });
        }
        if !sigma_jump.is_finite() || sigma_jump < 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "sigma_jump",
                value: sigma_jump,
                constraint: "must be finite and non-negative",
            });
        }
        Ok(Self {
            lambda,
            mu_jump,
            sigma_jump,
        })
    }

    /// The martingale compensator `lambda * (exp(mu_j + sigma_j^2 / 2) - 1)`.
    #[inline]
    pub fn compensator(&self) -> f64 {
        self.lambda * ((self.mu_jump + 0.5 * self.sigma_jump * self.sigma_jump).exp() - 1.0)
    }
}

impl Default for JumpDiffusionParams {
    fn default() -> Self {
        Self {
            lambda: 0.1,
            mu_jump: -0.1,
            sigma_jump: 0.2,
        }
    }
}

/// Simulates jump-diffusion price paths.
pub fn simulate(
    inputs: &SimulationInputs,
    params: &JumpDiffusionParams,
    n_steps: usize,
    n_paths: usize,
    rng: &mut SimRng,
) -> PathEnsemble {
    let mut ensemble = PathEnsemble::seeded(inputs.spot, inputs.maturity, n_steps, n_paths);
    let dt = inputs.maturity / n_steps as f64;
    let drift_dt =
        (inputs.rate - 0.5 * inputs.volatility * inputs.volatility - params.compensator()) * dt;
    let vol_sqrt_dt = inputs.volatility * dt.sqrt();
    let jump_mean = params.lambda * dt;
    let log_spot = inputs.spot.ln();

    for path in 0..n_paths {
        let row = ensemble.path_mut(path);
        let mut log_s = log_spot;
        for step in 0..n_steps {
            let diffusion = vol_sqrt_dt * rng.gen_normal();
            let count = rng.gen_poisson(jump_mean);
            let jump_sum = if count > 0 {
                let n = count as f64;
                params.mu_jump * n + params.sigma_jump * n.sqrt() * rng.gen_normal()
            } else {
                0.0
            };
            log_s += drift_dt + diffusion + jump_sum;
            row[step + 1] = log_s.exp();
        }
    }

    ensemble
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> SimulationInputs {
        SimulationInputs {
            spot: 100.0,
            rate: 0.05,
            volatility: 0.2,
            maturity: 1.0,
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(JumpDiffusionParams::new(0.1, -0.1, 0.2).is_ok());
        assert!(JumpDiffusionParams::new(-0.1, -0.1, 0.2).is_err());
        assert!(JumpDiffusionParams::new(0.1, f64::NAN, 0.2).is_err());
        assert!(JumpDiffusionParams::new(0.1, -0.1, -0.2).is_err());
    }

    #[test]
    fn test_zero_intensity_matches_lognormal() {
        let params = JumpDiffusionParams::new(0.0, 0.0, 0.0).unwrap();
        let mut rng_jump = SimRng::from_seed(42);
        let mut rng_gbm = SimRng::from_seed(42);
        let jump = simulate(&inputs(), &params, 50, 10, &mut rng_jump);
        let gbm = crate::lognormal::simulate(&inputs(), 50, 10, &mut rng_gbm);
        // With lambda = 0 the compensator vanishes and no jump normals are
        // drawn, so the two walks consume the identical shock sequence.
        assert_eq!(jump, gbm);
    }

    #[test]
    fn test_compensated_drift_preserves_martingale() {
        let params = JumpDiffusionParams::default();
        let mut rng = SimRng::from_seed(42);
        let ens = simulate(&inputs(), &params, 50, 20_000, &mut rng);
        let terminals = ens.terminal_prices();
        let mean = terminals.iter().sum::<f64>() / terminals.len() as f64;
        let expected = 100.0 * (0.05_f64).exp();
        assert!((mean - expected).abs() / expected < 0.02);
    }

    #[test]
    fn test_paths_positive_with_heavy_jumps() {
        let params = JumpDiffusionParams::new(5.0, -0.3, 0.5).unwrap();
        let mut rng = SimRng::from_seed(7);
        let ens = simulate(&inputs(), &params, 100, 100, &mut rng);
        for p in 0..100 {
            assert!(ens.path(p).iter().all(|s| s.is_finite() && *s > 0.0));
        }
    }
}
