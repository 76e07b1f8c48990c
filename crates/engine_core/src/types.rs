//! Shared contract types for the option outcome engine.
//!
//! These types are consumed by every layer: the model crate reads
//! [`MarketParams`] when simulating paths, and the pricing crate reads it
//! when building lattices and surfaces.

use thiserror::Error;

/// Option payoff direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// Intrinsic value of the option at the given spot.
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Returns true for calls.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }
}

/// Option exercise style.
///
/// The lattice pricer supports both; the Greek estimator always prices
/// American style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseStyle {
    /// Exercise only at expiry.
    European,
    /// Exercise at any time before expiry.
    American,
}

impl ExerciseStyle {
    /// Returns true for American style.
    #[inline]
    pub fn is_american(&self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

/// Market parameters for a single valuation or simulation request.
///
/// Immutable per call. The barrier `H` is only meaningful to the Monte Carlo
/// engine; lattice callers leave it at the strike or ignore it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketParams {
    /// Spot price (S0).
    pub spot: f64,
    /// Strike price (K).
    pub strike: f64,
    /// Barrier level (H).
    pub barrier: f64,
    /// Time to expiry in years (T).
    pub maturity: f64,
    /// Risk-free rate (r), annualised.
    pub rate: f64,
    /// Volatility (sigma), annualised.
    pub volatility: f64,
    /// Call or put.
    pub option_type: OptionType,
}

impl MarketParams {
    /// Creates new market parameters without validation.
    ///
    /// Numeric repair (negative volatility, non-positive maturity) is the
    /// responsibility of the consuming engine, which clamps rather than
    /// rejects so that a single bad input never aborts a whole grid.
    #[inline]
    pub fn new(
        spot: f64,
        strike: f64,
        barrier: f64,
        maturity: f64,
        rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            barrier,
            maturity,
            rate,
            volatility,
            option_type,
        }
    }

    /// Intrinsic value at the current spot.
    #[inline]
    pub fn intrinsic(&self) -> f64 {
        self.option_type.intrinsic(self.spot, self.strike)
    }
}

/// Structural errors for the option outcome engine.
///
/// Numeric edge cases (degenerate lattice parameters, NaN grid cells) are
/// handled locally with clamps and sentinels and never appear here. Only
/// configuration mistakes that indicate a caller bug surface as errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A model parameter is outside its mathematical domain.
    #[error("invalid parameter '{name}': {value} ({constraint})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Human-readable constraint, e.g. "must be positive".
        constraint: &'static str,
    },

    /// An engine configuration field is out of range.
    #[error("invalid configuration '{name}': {reason}")]
    InvalidConfig {
        /// Configuration field name.
        name: &'static str,
        /// Description of the violation.
        reason: String,
    },

    /// A required intermediate quantity could not be computed.
    ///
    /// Raised only at structural seams (e.g. the heatmap premium coming back
    /// NaN); per-cell degeneracy inside a grid is tolerated instead.
    #[error("numeric degeneracy in {context}")]
    NumericDegeneracy {
        /// Where the degeneracy was detected.
        context: &'static str,
    },
}
