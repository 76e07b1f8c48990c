//! Closed-form Black-Scholes reference pricing.
//!
//! Used by the test suite as the convergence target for the binomial
//! lattice, and available to hosts that want an instant European price.

use engine_core::OptionType;

/// Abramowitz & Stegun 7.1.26 complementary error function approximation,
/// maximum absolute error 1.5e-7.
fn erfc_approx(x: f64) -> f64 {
    let abs_x = x.abs();

    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let t = 1.0 / (1.0 + p * abs_x);
    let poly = a1 + t * (a2 + t * (a3 + t * (a4 + t * a5)));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    if x < 0.0 {
        2.0 - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc_approx(-x / std::f64::consts::SQRT_2)
}

/// European Black-Scholes price.
///
/// Degenerate inputs (`maturity <= 0` or `sigma <= 0`) collapse to
/// intrinsic value, mirroring the lattice's short-circuit policy.
pub fn black_scholes_price(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    sigma: f64,
    option_type: OptionType,
) -> f64 {
    if maturity <= 0.0 || sigma <= 0.0 {
        return option_type.intrinsic(spot, strike);
    }

    let vol_sqrt_t = sigma * maturity.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * sigma * sigma) * maturity) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    let df = (-rate * maturity).exp();

    match option_type {
        OptionType::Call => spot * norm_cdf(d1) - strike * df * norm_cdf(d2),
        OptionType::Put => strike * df * norm_cdf(-d2) - spot * norm_cdf(-d1),
    }
}
