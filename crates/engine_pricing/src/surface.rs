//! Grid evaluators: profit heatmap, value surface, synthetic IV surface.
//!
//! All three walk a `(time, price)` rectangle and fill a row-major value
//! matrix, `values[time_index * n_prices + price_index]`. Degenerate cells
//! carry NaN rather than aborting the grid; only a structural failure (the
//! heatmap premium itself coming back NaN) surfaces as an error.
//!
//! Time axes for the heatmap and value surface run from full maturity down
//! towards expiry, so row 0 is "today" and the last row is the eve of
//! expiry.

use engine_core::{EngineError, ExerciseStyle, MarketParams};

use crate::lattice::{binomial_price, LatticeRequest};
use crate::memo::LatticePricer;

/// Lattice steps used when the heatmap computes its own premium.
const PREMIUM_LATTICE_STEPS: usize = 200;

/// Lattice steps per grid cell; coarser than the premium tree because the
/// grid runs hundreds of valuations.
const CELL_LATTICE_STEPS: usize = 100;

/// Premiums at or below this are treated as zero for percent-profit.
const MIN_PREMIUM: f64 = 1e-6;

/// Evenly spaced grid over `[start, end]`, inclusive at both ends.
///
/// Works descending when `start > end`.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// A rectangular `(time, price)` grid of values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceGrid {
    /// Price axis, length `n_prices`.
    pub prices: Vec<f64>,
    /// Time axis in years, length `n_times`.
    pub times: Vec<f64>,
    /// Row-major values: `values[t * n_prices + p]`.
    pub values: Vec<f64>,
}

impl SurfaceGrid {
    /// Value at `(time_index, price_index)`.
    #[inline]
    pub fn at(&self, time_index: usize, price_index: usize) -> f64 {
        self.values[time_index * self.prices.len() + price_index]
    }
}

/// Profit heatmap grid bounds and resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatmapConfig {
    /// Lower price bound as a multiple of spot.
    pub low_factor: f64,
    /// Upper price bound as a multiple of spot.
    pub high_factor: f64,
    /// Price axis resolution.
    pub price_steps: usize,
    /// Time axis resolution.
    pub time_steps: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            low_factor: 0.7,
            high_factor: 1.3,
            price_steps: 20,
            time_steps: 15,
        }
    }
}

/// Profit/loss heatmap over remaining life and underlying price.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfitHeatmap {
    /// Price axis.
    pub prices: Vec<f64>,
    /// Time-remaining axis, descending from maturity towards expiry.
    pub times: Vec<f64>,
    /// Dollar profit per cell, row-major `[time][price]`.
    pub profit: Vec<f64>,
    /// Percent profit per cell; NaN when the premium is effectively zero.
    pub percent: Vec<f64>,
    /// Time labels in whole calendar days remaining.
    pub day_labels: Vec<String>,
    /// Price labels at one decimal place.
    pub price_labels: Vec<String>,
    /// Premium the profit is measured against.
    pub premium: f64,
}

/// Builds the profit/loss heatmap.
///
/// When `initial_premium` is absent or NaN the premium is computed from a
/// 200-step American lattice at the current market; grid cells themselves
/// are 100-step European revaluations through the shared cache, since a
/// cell asks "what would this contract trade at", not "what is its full
/// early-exercise value".
///
/// # Errors
///
/// [`EngineError::NumericDegeneracy`] when the computed premium is NaN;
/// no profit can be measured against an unknown cost basis.
pub fn build_profit_heatmap(
    pricer: &LatticePricer,
    market: &MarketParams,
    initial_premium: Option<f64>,
    config: &HeatmapConfig,
) -> Result<ProfitHeatmap, EngineError> {
    let premium = match initial_premium {
        Some(p) if !p.is_nan() => p,
        _ => {
            tracing::debug!("heatmap premium not supplied, pricing it from the lattice");
            binomial_price(&LatticeRequest {
                spot: market.spot,
                strike: market.strike,
                maturity: market.maturity,
                rate: market.rate,
                volatility: market.volatility,
                n_steps: PREMIUM_LATTICE_STEPS,
                option_type: market.option_type,
                style: ExerciseStyle::American,
            })
        }
    };
    if premium.is_nan() {
        return Err(EngineError::NumericDegeneracy {
            context: "profit heatmap premium",
        });
    }

    let prices = linspace(
        market.spot * config.low_factor,
        market.spot * config.high_factor,
        config.price_steps,
    );
    // Descending towards expiry; 1e-6 years keeps the last row off T = 0.
    let times = linspace(market.maturity, 1e-6, config.time_steps);

    let mut profit = Vec::with_capacity(times.len() * prices.len());
    let mut percent = Vec::with_capacity(times.len() * prices.len());
    for &t_remain in &times {
        for &s in &prices {
            let value = pricer.price(&LatticeRequest {
                spot: s,
                strike: market.strike,
                maturity: t_remain,
                rate: market.rate,
                volatility: market.volatility,
                n_steps: CELL_LATTICE_STEPS,
                option_type: market.option_type,
                style: ExerciseStyle::European,
            });
            if value.is_nan() {
                profit.push(f64::NAN);
                percent.push(f64::NAN);
            } else {
                let cell_profit = value - premium;
                profit.push(cell_profit);
                percent.push(if premium > MIN_PREMIUM {
                    cell_profit / premium * 100.0
                } else {
                    f64::NAN
                });
            }
        }
    }

    let day_labels = times.iter().map(|t| format!("{}", (t * 365.0) as i64)).collect();
    let price_labels = prices.iter().map(|p| format!("{p:.1}")).collect();

    Ok(ProfitHeatmap {
        prices,
        times,
        profit,
        percent,
        day_labels,
        price_labels,
        premium,
    })
}

/// Value surface grid bounds and resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceConfig {
    /// Lower price bound as a multiple of spot.
    pub low_factor: f64,
    /// Upper price bound as a multiple of spot.
    pub high_factor: f64,
    /// Price axis resolution.
    pub price_steps: usize,
    /// Time axis resolution.
    pub time_steps: usize,
    /// Exercise style used for every cell.
    pub style: ExerciseStyle,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            low_factor: 0.5,
            high_factor: 2.0,
            price_steps: 30,
            time_steps: 30,
            style: ExerciseStyle::American,
        }
    }
}

/// Builds the option value surface over `(time remaining, underlying price)`.
///
/// Cells are raw uncached 100-step lattice valuations in the requested
/// style; NaN cells are tolerated and left in the grid.
pub fn build_value_surface(market: &MarketParams, config: &SurfaceConfig) -> SurfaceGrid {
    let prices = linspace(
        market.spot * config.low_factor,
        market.spot * config.high_factor,
        config.price_steps,
    );
    let times = linspace(market.maturity, 1e-6, config.time_steps);

    let mut values = Vec::with_capacity(times.len() * prices.len());
    for &t_remain in &times {
        for &s in &prices {
            values.push(binomial_price(&LatticeRequest {
                spot: s,
                strike: market.strike,
                maturity: t_remain,
                rate: market.rate,
                volatility: market.volatility,
                n_steps: CELL_LATTICE_STEPS,
                option_type: market.option_type,
                style: config.style,
            }));
        }
    }

    SurfaceGrid {
        prices,
        times,
        values,
    }
}

/// Synthetic implied-volatility surface resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolSurfaceConfig {
    /// Strike axis resolution.
    pub price_steps: usize,
    /// Maturity axis resolution.
    pub time_steps: usize,
}

impl Default for VolSurfaceConfig {
    fn default() -> Self {
        Self {
            price_steps: 30,
            time_steps: 30,
        }
    }
}

/// Builds a synthetic implied-volatility surface around the base volatility.
///
/// The surface is parametric, not calibrated: a quadratic smile that
/// steepens at short maturities, a linear equity-style skew, and a decaying
/// term-structure lift, all on log-moneyness `m = ln(s / K)`:
///
/// ```text
/// iv = base + 0.5 m^2 / sqrt(t + 0.1) - 0.25 m + 0.03 exp(-2 t)
/// ```
///
/// clamped into `[0.05, 1.50]`. The strike axis spans `[0.75, 1.25] * S0`
/// and the maturity axis `[max(T/20, 0.01), 1.2 T]`, ascending.
pub fn build_vol_surface(market: &MarketParams, config: &VolSurfaceConfig) -> SurfaceGrid {
    let prices = linspace(market.spot * 0.75, market.spot * 1.25, config.price_steps);
    let times = linspace(
        (market.maturity / 20.0).max(0.01),
        market.maturity * 1.2,
        config.time_steps,
    );

    let base = market.volatility;
    let mut values = Vec::with_capacity(times.len() * prices.len());
    for &t in &times {
        for &s in &prices {
            let m = (s / market.strike).ln();
            let smile = 0.5 * m * m / (t + 0.1).sqrt();
            let skew = -0.25 * m;
            let term = 0.03 * (-2.0 * t).exp();
            values.push((base + smile + skew + term).clamp(0.05, 1.50));
        }
    }

    SurfaceGrid {
        prices,
        times,
        values,
    }
}
