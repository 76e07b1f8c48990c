//! # Engine Models (Layer 2)
//!
//! The stochastic path-simulator family for the option outcome engine.
//!
//! Four interchangeable models share one output contract: given
//! [`SimulationInputs`], a step count, a path count, and a seed, each
//! produces a [`PathEnsemble`], a row-major `(n_paths, n_steps + 1)` price
//! grid plus its time grid, with column 0 pinned to the spot.
//!
//! ## Static dispatch
//!
//! Model selection goes through the [`ModelSpec`] enum, one variant per
//! model, dispatched with `match` rather than `Box<dyn Trait>` or string
//! tags. An unknown model is therefore unrepresentable.
//!
//! ## Determinism
//!
//! Every simulate call reseeds its own RNG from the explicit seed argument,
//! so two calls with identical parameters produce bit-identical ensembles.
//!
//! ## Failure policy
//!
//! Parameter structs validate at construction and return structured errors.
//! The simulators themselves never fail on numeric edge cases;
//! pre-validation of `volatility >= 0`, `maturity > 0`, `n_steps >= 1` is
//! the caller's responsibility.

pub mod ensemble;
pub mod heston;
pub mod jump_diffusion;
pub mod lognormal;
pub mod model_enum;
pub mod rng;
pub mod rough_bergomi;

pub use ensemble::PathEnsemble;
pub use heston::HestonParams;
pub use jump_diffusion::JumpDiffusionParams;
pub use model_enum::{ModelSpec, SimulationInputs};
pub use rng::SimRng;
pub use rough_bergomi::RoughBergomiParams;

/// Default seed used when callers do not override it, kept fixed for
/// reproducible test runs.
pub const DEFAULT_SEED: u64 = 42;
