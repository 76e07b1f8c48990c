//! Lognormal (geometric Brownian motion) path simulation.
//!
//! Uses the exact log-space solution per step:
//! ```text
//! S(t+dt) = S(t) * exp((r - 0.5*sigma^2)*dt + sigma*sqrt(dt)*Z)
//! ```
//! so the discretisation is stable regardless of step size.

use crate::ensemble::PathEnsemble;
use crate::model_enum::SimulationInputs;
use crate::rng::SimRng;

/// Simulates lognormal price paths under the risk-neutral drift.
///
/// Log-increments are accumulated path by path and exponentiated, keeping
/// the walk in log-space until the final write.
pub fn simulate(
    inputs: &SimulationInputs,
    n_steps: usize,
    n_paths: usize,
    rng: &mut SimRng,
) -> PathEnsemble {
    let mut ensemble = PathEnsemble::seeded(inputs.spot, inputs.maturity, n_steps, n_paths);
    let dt = inputs.maturity / n_steps as f64;
    let drift_dt = (inputs.rate - 0.5 * inputs.volatility * inputs.volatility) * dt;
    let vol_sqrt_dt = inputs.volatility * dt.sqrt();
    let log_spot = inputs.spot.ln();

    for path in 0..n_paths {
        let row = ensemble.path_mut(path);
        let mut log_s = log_spot;
        for step in 0..n_steps {
            log_s += drift_dt + vol_sqrt_dt * rng.gen_normal();
            row[step + 1] = log_s.exp();
        }
    }

    ensemble
}
