//! # Engine Pricing (Layer 3)
//!
//! Valuation and estimation built on the model layer:
//!
//! - [`lattice`]: Cox-Ross-Rubinstein binomial pricer with an explicit
//!   edge-case policy (clamp and substitute, never panic).
//! - [`memo`]: the memoizing [`memo::LatticePricer`] wrapper, keyed on the
//!   bit-exact input tuple, capacity 128, LRU eviction.
//! - [`greeks`]: finite-difference delta/gamma/vega/theta/rho over the
//!   memoized lattice.
//! - [`barrier`]: the barrier-crossing Monte Carlo engine and its
//!   trigger-statistics companion mode.
//! - [`surface`]: profit/loss heatmap, option value surface, and the
//!   synthetic implied-volatility surface.
//! - [`analytical`]: closed-form Black-Scholes reference used by tests.
//!
//! Every entry point is a pure, blocking computation over in-memory arrays.
//! The only shared mutable state is the lattice memoization cache, which is
//! mutex-guarded so hosts may fan grid cells across threads; a racing
//! recompute wastes work but cannot produce a wrong value.

pub mod analytical;
pub mod barrier;
pub mod greeks;
pub mod lattice;
pub mod memo;
pub mod surface;

pub use barrier::{BarrierEngineConfig, BarrierMonteCarloEngine, BarrierSimulation, TriggerStats};
pub use greeks::{estimate_greeks, GreekEstimate};
pub use lattice::{binomial_price, LatticeRequest};
pub use memo::LatticePricer;
pub use surface::{
    build_profit_heatmap, build_value_surface, build_vol_surface, HeatmapConfig, ProfitHeatmap,
    SurfaceConfig, SurfaceGrid, VolSurfaceConfig,
};
