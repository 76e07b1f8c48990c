//! Heston stochastic-volatility path simulation.
//!
//! The model couples price and instantaneous variance:
//! ```text
//! dS = r * S * dt + sqrt(V) * S * dW_S
//! dV = kappa * (theta - V) * dt + xi * sqrt(V) * dW_V
//! E[dW_S * dW_V] = rho * dt
//! ```
//! Discretised with the full-truncation Euler scheme: the variance drawn
//! into the square roots is floored at zero, and the updated variance is
//! floored at a small epsilon so the price step never sees a negative
//! variance. The variance update depends on its own previous value, so the
//! scheme is inherently sequential along each path.

use engine_core::EngineError;

use crate::ensemble::PathEnsemble;
use crate::model_enum::SimulationInputs;
use crate::rng::SimRng;

/// Floor applied to the variance after each update.
const VARIANCE_FLOOR: f64 = 1e-8;

/// Heston model parameters.
///
/// Long-run variance `theta` and initial variance `v0` default to the
/// square of the input volatility via [`HestonParams::from_volatility`],
/// which is how the barrier engine seeds them when the caller provides only
/// a scalar volatility.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonParams {
    /// Mean-reversion speed (kappa).
    pub kappa: f64,
    /// Long-run variance (theta).
    pub theta: f64,
    /// Volatility of variance (xi).
    pub xi: f64,
    /// Initial variance (v0).
    pub v0: f64,
    /// Correlation between price and variance shocks (rho).
    pub rho: f64,
}

impl HestonParams {
    /// Creates validated Heston parameters.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] when `kappa <= 0`,
    /// `theta < 0`, `xi < 0`, `v0 < 0`, or `rho` is outside `[-1, 1]`.
    pub fn new(kappa: f64, theta: f64, xi: f64, v0: f64, rho: f64) -> Result<Self, EngineError> {
        if !kappa.is_finite() || kappa <= 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "kappa",
                value: kappa,
                constraint: "must be positive",
            });
        }
        if !theta.is_finite() || theta < 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "theta",
                value: theta,
                constraint: "must be non-negative",
            });
        }
        if !xi.is_finite() || xi < 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "xi",
                value: xi,
                constraint: "must be non-negative",
            });
        }
        if !v0.is_finite() || v0 < 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "v0",
                value: v0,
                constraint: "must be non-negative",
            });
        }
        if !rho.is_finite() || !(-1.0..=1.0).contains(&rho) {
            return Err(EngineError::InvalidParameter {
                name: "rho",
                value: rho,
                constraint: "must be in [-1, 1]",
            });
        }
        Ok(Self {
            kappa,
            theta,
            xi,
            v0,
            rho,
        })
    }

    /// Default parameters with `theta` and `v0` seeded from a scalar
    /// volatility estimate.
    pub fn from_volatility(volatility: f64) -> Self {
        let var = (volatility.max(0.0)).powi(2);
        Self {
            kappa: 2.0,
            theta: var,
            xi: 0.1,
            v0: var,
            rho: -0.7,
        }
    }

    /// True when `2 * kappa * theta > xi^2`, the sufficient condition for
    /// the continuous-time variance to stay positive.
    #[inline]
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.kappa * self.theta > self.xi * self.xi
    }
}

/// Simulates Heston price paths with the full-truncation scheme.
pub fn simulate(
    inputs: &SimulationInputs,
    params: &HestonParams,
    n_steps: usize,
    n_paths: usize,
    rng: &mut SimRng,
) -> PathEnsemble {
    let mut ensemble = PathEnsemble::seeded(inputs.spot, inputs.maturity, n_steps, n_paths);
    let dt = inputs.maturity / n_steps as f64;
    let sqrt_dt = dt.sqrt();
    let rho_perp = (1.0 - params.rho * params.rho).sqrt();
    let log_spot = inputs.spot.ln();

    for path in 0..n_paths {
        let row = ensemble.path_mut(path);
        let mut v = params.v0;
        let mut log_s = log_spot;
        for step in 0..n_steps {
            let z1 = rng.gen_normal();
            let z2 = params.rho * z1 + rho_perp * rng.gen_normal();

            let v_pos = v.max(0.0);
            v = (v + params.kappa * (params.theta - v) * dt
                + params.xi * v_pos.sqrt() * z2 * sqrt_dt)
                .max(VARIANCE_FLOOR);
            log_s += (inputs.rate - 0.5 * v) * dt + v.sqrt() * z1 * sqrt_dt;
            row[step + 1] = log_s.exp();
        }
    }

    ensemble
}
