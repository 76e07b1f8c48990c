//! Static dispatch enum for the path simulator family.
//!
//! Model selection is a tagged enum dispatched with `match`, one variant per
//! simulator. There is deliberately no string-tag path and no
//! `Box<dyn Trait>`: an unrecognised model cannot be constructed, so the
//! "unknown model" failure class is eliminated at the type level.

use crate::ensemble::PathEnsemble;
use crate::heston::{self, HestonParams};
use crate::jump_diffusion::{self, JumpDiffusionParams};
use crate::lognormal;
use crate::rng::SimRng;
use crate::rough_bergomi::{self, RoughBergomiParams};

/// Scalar inputs shared by every simulator.
///
/// Model-specific parameters travel inside the [`ModelSpec`] variant; these
/// four scalars are what every model needs. Pre-validation (`volatility >=
/// 0`, `maturity > 0`) is the caller's job; the simulators assume repaired
/// inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationInputs {
    /// Initial spot price (S0).
    pub spot: f64,
    /// Risk-neutral drift rate (r), annualised.
    pub rate: f64,
    /// Volatility (sigma), annualised.
    pub volatility: f64,
    /// Time to expiry in years (T).
    pub maturity: f64,
}

/// The stochastic model driving a simulation request.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelSpec {
    /// Lognormal diffusion (geometric Brownian motion).
    Lognormal,
    /// Merton jump-diffusion.
    JumpDiffusion(JumpDiffusionParams),
    /// Heston stochastic volatility (full-truncation scheme).
    Heston(HestonParams),
    /// Rough-Bergomi with the hybrid FFT scheme.
    RoughBergomi(RoughBergomiParams),
}

impl ModelSpec {
    /// Model name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ModelSpec::Lognormal => "lognormal",
            ModelSpec::JumpDiffusion(_) => "jump-diffusion",
            ModelSpec::Heston(_) => "heston",
            ModelSpec::RoughBergomi(_) => "rough-bergomi",
        }
    }

    /// Simulates a path ensemble under this model.
    ///
    /// The RNG is reseeded from `seed` inside this call, so identical
    /// arguments always produce a bit-identical ensemble.
    pub fn simulate(
        &self,
        inputs: &SimulationInputs,
        n_steps: usize,
        n_paths: usize,
        seed: u64,
    ) -> PathEnsemble {
        let mut rng = SimRng::from_seed(seed);
        tracing::debug!(
            model = self.name(),
            n_steps,
            n_paths,
            seed,
            "simulating path ensemble"
        );
        match self {
            ModelSpec::Lognormal => lognormal::simulate(inputs, n_steps, n_paths, &mut rng),
            ModelSpec::JumpDiffusion(params) => {
                jump_diffusion::simulate(inputs, params, n_steps, n_paths, &mut rng)
            }
            ModelSpec::Heston(params) => {
                heston::simulate(inputs, params, n_steps, n_paths, &mut rng)
            }
            ModelSpec::RoughBergomi(params) => {
                rough_bergomi::simulate(inputs, params, n_steps, n_paths, &mut rng)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> SimulationInputs {
        SimulationInputs {
            spot: 100.0,
            rate: 0.05,
            volatility: 0.2,
            maturity: 0.5,
        }
    }

    fn all_models() -> Vec<ModelSpec> {
        vec![
            ModelSpec::Lognormal,
            ModelSpec::JumpDiffusion(JumpDiffusionParams::default()),
            ModelSpec::Heston(HestonParams::from_volatility(0.2)),
            ModelSpec::RoughBergomi(RoughBergomiParams::default()),
        ]
    }

    #[test]
    fn test_shared_output_contract() {
        for model in all_models() {
            let ens = model.simulate(&inputs(), 32, 7, 42);
            assert_eq!(ens.n_paths(), 7, "{}", model.name());
            assert_eq!(ens.n_steps(), 32, "{}", model.name());
            assert_eq!(ens.time_grid().len(), 33);
            for p in 0..7 {
                assert_eq!(ens.path(p)[0], 100.0, "{} seed price", model.name());
            }
        }
    }

    #[test]
    fn test_determinism_per_model() {
        for model in all_models() {
            let a = model.simulate(&inputs(), 64, 16, 42);
            let b = model.simulate(&inputs(), 64, 16, 42);
            assert_eq!(a, b, "{} not bit-deterministic", model.name());
        }
    }

    #[test]
    fn test_seed_changes_ensemble() {
        for model in all_models() {
            let a = model.simulate(&inputs(), 64, 16, 42);
            let b = model.simulate(&inputs(), 64, 16, 43);
            assert_ne!(a, b, "{} ignored the seed", model.name());
        }
    }

    #[test]
    fn test_model_names() {
        let names: Vec<&str> = all_models().iter().map(|m| m.name()).collect();
        assert_eq!(
            names,
            vec!["lognormal", "jump-diffusion", "heston", "rough-bergomi"]
        );
    }
}
