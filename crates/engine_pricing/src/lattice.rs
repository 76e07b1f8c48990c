//! Cox-Ross-Rubinstein binomial lattice valuation.
//!
//! Tree parameters per step of size `dt = T / N`:
//! ```text
//! u = exp(sigma * sqrt(dt))    d = 1 / u
//! p = (exp(r * dt) - d) / (u - d)
//! ```
//! Terminal payoffs are evaluated across all `N + 1` nodes, then the tree is
//! folded backward one level at a time; American nodes take the maximum of
//! the discounted continuation value and immediate exercise.
//!
//! ## Edge-case policy
//!
//! A single bad cell must not abort a whole surface grid, so out-of-domain
//! inputs are clamped or substituted rather than raised:
//!
//! - `n_steps == 0` → NaN sentinel
//! - `maturity < 0` or `maturity < 1e-9` → intrinsic at spot
//! - `sigma < 0` → clamped to 0
//! - `u == 1` (sigma ~ 0 or dt ~ 0) → discounted European payoff, no tree
//! - `u` non-finite → NaN sentinel
//! - `p` outside `[0, 1]` → clamped, with a logged warning

use engine_core::{ExerciseStyle, OptionType};

/// Maturities below this threshold short-circuit to intrinsic value.
const MIN_MATURITY: f64 = 1e-9;

/// Tolerance on the risk-neutral probability before the clamp is reported.
const P_TOLERANCE: f64 = 1e-9;

/// One lattice valuation request.
///
/// Doubles as the identity of a cached price: two requests with bit-equal
/// fields must produce the same value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeRequest {
    /// Spot price (S).
    pub spot: f64,
    /// Strike price (K).
    pub strike: f64,
    /// Time to expiry in years (T).
    pub maturity: f64,
    /// Risk-free rate (r).
    pub rate: f64,
    /// Volatility (sigma).
    pub volatility: f64,
    /// Number of tree steps (N).
    pub n_steps: usize,
    /// Call or put.
    pub option_type: OptionType,
    /// European or American.
    pub style: ExerciseStyle,
}

impl LatticeRequest {
    /// Intrinsic value at the request's spot.
    #[inline]
    pub fn intrinsic(&self) -> f64 {
        self.option_type.intrinsic(self.spot, self.strike)
    }
}

/// Prices a vanilla option on a CRR binomial lattice.
///
/// Returns NaN as the invalid-input sentinel; see the module-level
/// edge-case policy. Never panics on numeric inputs.
pub fn binomial_price(req: &LatticeRequest) -> f64 {
    if req.n_steps == 0 {
        tracing::warn!("lattice step count must be positive, returning NaN");
        return f64::NAN;
    }
    if req.maturity < 0.0 {
        tracing::warn!(maturity = req.maturity, "negative maturity, returning intrinsic");
        return req.intrinsic();
    }

    let sigma = if req.volatility < 0.0 {
        tracing::warn!(
            volatility = req.volatility,
            "negative volatility clamped to 0"
        );
        0.0
    } else {
        req.volatility
    };

    if req.maturity < MIN_MATURITY {
        return req.intrinsic();
    }

    let n = req.n_steps;
    let dt = req.maturity / n as f64;
    let u = (sigma * dt.sqrt()).exp();

    if u == 1.0 {
        // Degenerate tree (sigma ~ 0 or dt ~ 0): the price collapses to the
        // discounted payoff at the forward-less spot.
        return (-req.rate * req.maturity).exp() * req.intrinsic();
    }
    if !u.is_finite() || u == 0.0 {
        tracing::warn!(u, "binomial up factor invalid, returning NaN");
        return f64::NAN;
    }

    let d = 1.0 / u;
    let growth = (req.rate * dt).exp();
    if u - d == 0.0 {
        tracing::warn!("binomial up and down factors coincide, returning NaN");
        return f64::NAN;
    }

    let mut p = (growth - d) / (u - d);
    if !(-P_TOLERANCE..=1.0 + P_TOLERANCE).contains(&p) {
        tracing::warn!(
            p,
            "risk-neutral probability outside [0, 1], clamping; inputs may admit arbitrage"
        );
    }
    p = p.clamp(0.0, 1.0);

    let q = 1.0 - p;
    let disc = (-req.rate * dt).exp();

    // Terminal payoffs across all N + 1 nodes; node j has j down-moves.
    let mut values: Vec<f64> = (0..=n)
        .map(|j| {
            let terminal = req.spot * u.powi((n - j) as i32) * d.powi(j as i32);
            req.option_type.intrinsic(terminal, req.strike)
        })
        .collect();

    let american = req.style.is_american();
    for i in (0..n).rev() {
        for j in 0..=i {
            let continuation = disc * (p * values[j] + q * values[j + 1]);
            values[j] = if american {
                let node_spot = req.spot * u.powi((i - j) as i32) * d.powi(j as i32);
                continuation.max(req.option_type.intrinsic(node_spot, req.strike))
            } else {
                continuation
            };
        }
    }

    if values[0].is_nan() {
        tracing::warn!("binomial valuation produced NaN");
    }
    values[0]
}
