//! # Engine Core (Layer 1)
//!
//! Foundation crate for the option outcome engine:
//!
//! - Shared contract types ([`types::OptionType`], [`types::ExerciseStyle`],
//!   [`types::MarketParams`])
//! - The engine error taxonomy ([`types::EngineError`])
//! - A bounded, LRU-evicting memoization cache ([`cache::BoundedCache`])
//! - The return-statistics estimator ([`stats::estimate_return_statistics`])
//!
//! Everything here is pure, synchronous, and free of I/O. Numeric edge cases
//! are clamped or substituted locally; only structural configuration errors
//! surface as `Result::Err`.

pub mod cache;
pub mod stats;
pub mod types;

pub use cache::BoundedCache;
pub use stats::{estimate_return_statistics, ReturnStats};
pub use types::{EngineError, ExerciseStyle, MarketParams, OptionType};
