//! Rough-Bergomi path simulation via the hybrid FFT scheme.
//!
//! The fractional driver `F` is a discrete Volterra convolution of the
//! volatility shocks with the power-law kernel
//! ```text
//! a[k] = dt^(H+1/2) / (H+1/2) * ((k+1)^(H+1/2) - k^(H+1/2))
//! ```
//! computed exactly for the first `m` lags and through a circulant-embedding
//! FFT of length `2N` for the remainder, giving O(N log N) cost per path.
//! This is the only frequency-domain member of the simulator family.
//!
//! Instantaneous variance is `v(t) = xi0 * exp(eta * F(t) - eta^2/2 * t^(2H))`
//! with a flat forward-variance curve `xi0 = sigma^2`, and the log-price is
//! evolved by Euler-Maruyama under a second, rho-correlated Brownian
//! increment.

use engine_core::EngineError;
use num_complex::Complex;
use rustfft::FftPlanner;

use crate::ensemble::PathEnsemble;
use crate::model_enum::SimulationInputs;
use crate::rng::SimRng;

/// Rough-Bergomi model parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoughBergomiParams {
    /// Hurst exponent (H), roughness of the volatility path.
    pub hurst: f64,
    /// Volatility of volatility (eta).
    pub eta: f64,
    /// Correlation between price and volatility shocks (rho).
    pub rho: f64,
    /// Exact/tail split point for the hybrid convolution. `None` selects
    /// `n_steps / 10`, an empirical default with no documented derivation.
    pub cutoff: Option<usize>,
}

impl RoughBergomiParams {
    /// Creates validated rough-Bergomi parameters.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] when `hurst` is outside
    /// `(0, 1)`, `eta < 0`, or `rho` is outside `[-1, 1]`.
    pub fn new(hurst: f64, eta: f64, rho: f64, cutoff: Option<usize>) -> Result<Self, EngineError> {
        if !hurst.is_finite() || hurst <= 0.0 || hurst >= 1.0 {
            return Err(EngineError::InvalidParameter {
                name: "hurst",
                value: hurst,
                constraint: "must be in (0, 1)",
            });
        }
        if !eta.is_finite() || eta < 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "eta",
                value: eta,
                constraint: "must be non-negative",
            });
        }
        if !rho.is_finite() || !(-1.0..=1.0).contains(&rho) {
            return Err(EngineError::InvalidParameter {
                name: "rho",
                value: rho,
                constraint: "must be in [-1, 1]",
            });
        }
        Ok(Self {
            hurst,
            eta,
            rho,
            cutoff,
        })
    }

    /// Resolved split point for a given step count, clamped into `[1, n_steps]`.
    #[inline]
    pub fn cutoff_for(&self, n_steps: usize) -> usize {
        self.cutoff.unwrap_or(n_steps / 10).clamp(1, n_steps)
    }
}

impl Default for RoughBergomiParams {
    fn default() -> Self {
        Self {
            hurst: 0.1,
            eta: 1.5,
            rho: 0.0,
            cutoff: None,
        }
    }
}

/// Power-law kernel weights for the Volterra convolution.
fn kernel_weights(hurst: f64, dt: f64, n_steps: usize) -> Vec<f64> {
    let alpha = hurst + 0.5;
    let prefac = dt.powf(alpha) / alpha;
    (0..n_steps)
        .map(|k| prefac * (((k + 1) as f64).powf(alpha) - (k as f64).powf(alpha)))
        .collect()
}

/// Simulates rough-Bergomi price paths with the hybrid FFT scheme.
///
/// The flat forward-variance curve is taken as `inputs.volatility^2`.
pub fn simulate(
    inputs: &SimulationInputs,
    params: &RoughBergomiParams,
    n_steps: usize,
    n_paths: usize,
    rng: &mut SimRng,
) -> PathEnsemble {
    let mut ensemble = PathEnsemble::seeded(inputs.spot, inputs.maturity, n_steps, n_paths);
    let n = n_steps;
    let dt = inputs.maturity / n as f64;
    let sqrt_dt = dt.sqrt();
    let xi0 = inputs.volatility * inputs.volatility;
    let two_h = 2.0 * params.hurst;
    let rho_perp = (1.0 - params.rho * params.rho).sqrt();

    let weights = kernel_weights(params.hurst, dt, n);
    let m = params.cutoff_for(n);
    let (exact, tail) = weights.split_at(m);

    // Tail kernel embedded at its true lags (m..N-1) in a length-2N buffer;
    // the zero padding makes the circular convolution linear, so the exact
    // part and the FFT part sum to the full Volterra convolution.
    let fft_len = 2 * n;
    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let kernel_fft = if tail.is_empty() {
        None
    } else {
        let mut buf = vec![Complex::new(0.0, 0.0); fft_len];
        for (k, w) in tail.iter().enumerate() {
            buf[m + k] = Complex::new(*w, 0.0);
        }
        forward.process(&mut buf);
        Some(buf)
    };

    let mut z_price = vec![0.0; n];
    let mut z_vol = vec![0.0; n];
    let mut driver = vec![0.0; n];
    let mut conv = vec![Complex::new(0.0, 0.0); fft_len];
    let time_grid = ensemble.time_grid().to_vec();

    for path in 0..n_paths {
        rng.fill_normal(&mut z_price);
        rng.fill_normal(&mut z_vol);

        // Exact convolution over the first m lags.
        for i in 0..n {
            let mut sum = 0.0;
            for (k, w) in exact.iter().enumerate().take(i + 1) {
                sum += w * z_vol[i - k];
            }
            driver[i] = sum;
        }

        // FFT convolution of the tail.
        if let Some(kernel) = &kernel_fft {
            for i in 0..fft_len {
                conv[i] = if i < n {
                    Complex::new(z_vol[i], 0.0)
                } else {
                    Complex::new(0.0, 0.0)
                };
            }
            forward.process(&mut conv);
            for (c, k) in conv.iter_mut().zip(kernel.iter()) {
                *c *= *k;
            }
            inverse.process(&mut conv);
            let scale = 1.0 / fft_len as f64;
            for i in 0..n {
                driver[i] += conv[i].re * scale;
            }
        }

        // Euler-Maruyama for the log-price under the correlated increment.
        let row = ensemble.path_mut(path);
        let mut log_s = inputs.spot.ln();
        for i in 0..n {
            let t = time_grid[i];
            let v = xi0 * (params.eta * driver[i] - 0.5 * params.eta * params.eta * t.powf(two_h))
                .exp();
            let dw = (params.rho * z_vol[i] + rho_perp * z_price[i]) * sqrt_dt;
            log_s += (inputs.rate - 0.5 * v) * dt + v.sqrt() * dw;
            row[i + 1] = log_s.exp();
        }
    }

    ensemble
}
