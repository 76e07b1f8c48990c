//! Finite-difference Greeks over the memoized binomial lattice.
//!
//! All five sensitivities come from central (delta, gamma, vega, rho) or
//! forward (theta) differences of American lattice prices. Bump sizes:
//!
//! - spot: `0.01 * S`
//! - volatility: `0.01` absolute
//! - rate: `0.0001` absolute
//! - time: `min(1/365, T/10)`, so theta stays inside the option's life
//!
//! Vega, theta, and rho are scaled down by 100 to per-1% (and per-day for
//! theta) conventions.

use engine_core::{ExerciseStyle, OptionType};

use crate::lattice::LatticeRequest;
use crate::memo::LatticePricer;

/// Default step-count request before the maturity-based cap.
pub const DEFAULT_GREEK_STEPS: usize = 500;

/// Floor on lattice step count after the maturity cap.
const MIN_GREEK_STEPS: usize = 50;

/// Maturity floor used inside bumped revaluations.
const MIN_BUMP_MATURITY: f64 = 1e-3;

/// Finite-difference sensitivity estimates.
///
/// Any field is NaN when the underlying lattice returned its NaN sentinel
/// for one of the bumped revaluations.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreekEstimate {
    /// dV/dS.
    pub delta: f64,
    /// d2V/dS2.
    pub gamma: f64,
    /// dV per 1% absolute volatility move.
    pub vega: f64,
    /// dV per calendar day of decay.
    pub theta: f64,
    /// dV per 1% absolute rate move.
    pub rho: f64,
}

/// Estimates American-exercise Greeks by bumped lattice revaluation.
///
/// The shared cache is cleared up front so no bumped price can be served
/// from a previous parameter set. Step count adapts to maturity:
/// `min(requested_steps, max(50, floor(T * 365 * 10)))`, ten steps per
/// calendar day, which keeps weekly options from wasting a 500-step tree.
pub fn estimate_greeks(
    pricer: &LatticePricer,
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    option_type: OptionType,
    requested_steps: usize,
) -> GreekEstimate {
    pricer.clear();

    let scaled = (maturity * 365.0 * 10.0) as usize;
    let n_steps = requested_steps.min(scaled.max(MIN_GREEK_STEPS));
    tracing::debug!(n_steps, maturity, "estimating finite-difference greeks");

    let price = |s: f64, t: f64, r: f64, sigma: f64| -> f64 {
        let req = LatticeRequest {
            spot: s,
            strike,
            maturity: t.max(MIN_BUMP_MATURITY),
            rate: r,
            volatility: sigma,
            n_steps,
            option_type,
            style: ExerciseStyle::American,
        };
        pricer.price(&req)
    };

    let base = price(spot, maturity, rate, volatility);

    let eps_spot = 0.01 * spot;
    let eps_vol = 0.01;
    let eps_rate = 0.0001;
    let eps_time = (1.0 / 365.0_f64).min(maturity / 10.0);

    let spot_up = price(spot + eps_spot, maturity, rate, volatility);
    let spot_down = price(spot - eps_spot, maturity, rate, volatility);
    let delta = (spot_up - spot_down) / (2.0 * eps_spot);
    let gamma = (spot_up - 2.0 * base + spot_down) / (eps_spot * eps_spot);

    let vol_up = price(spot, maturity, rate, volatility + eps_vol);
    let vol_down = price(spot, maturity, rate, volatility - eps_vol);
    let vega = (vol_up - vol_down) / (2.0 * eps_vol) / 100.0;

    let decayed = price(spot, maturity - eps_time, rate, volatility);
    let theta = (decayed - base) / eps_time / 100.0;

    let rate_up = price(spot, maturity, rate + eps_rate, volatility);
    let rate_down = price(spot, maturity, rate - eps_rate, volatility);
    let rho = (rate_up - rate_down) / (2.0 * eps_rate) / 100.0;

    GreekEstimate {
        delta,
        gamma,
        vega,
        theta,
        rho,
    }
}
