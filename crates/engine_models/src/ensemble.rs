//! Simulated path ensembles.
//!
//! A [`PathEnsemble`] is the shared output contract of every simulator:
//! a row-major `(n_paths, n_steps + 1)` price grid plus its time grid.
//! Column 0 always holds the initial spot. Ensembles are produced once per
//! request and never persisted.

/// A grid of simulated price paths with its time grid.
///
/// # Memory layout
///
/// Prices are stored row-major: `prices[path * (n_steps + 1) + step]`,
/// where `step = 0` is the seed price.
#[derive(Clone, Debug, PartialEq)]
pub struct PathEnsemble {
    prices: Vec<f64>,
    time_grid: Vec<f64>,
    n_paths: usize,
    n_steps: usize,
}

impl PathEnsemble {
    /// Allocates an ensemble with every path seeded at `spot` and a uniform
    /// time grid over `[0, maturity]`.
    pub fn seeded(spot: f64, maturity: f64, n_steps: usize, n_paths: usize) -> Self {
        let width = n_steps + 1;
        let mut prices = vec![0.0; n_paths * width];
        for path in 0..n_paths {
            prices[path * width] = spot;
        }
        let dt = maturity / n_steps as f64;
        let time_grid = (0..width).map(|i| i as f64 * dt).collect();
        Self {
            prices,
            time_grid,
            n_paths,
            n_steps,
        }
    }

    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time steps (grid width is `n_steps + 1`).
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// The uniform time grid, length `n_steps + 1`.
    #[inline]
    pub fn time_grid(&self) -> &[f64] {
        &self.time_grid
    }

    /// One full path, including the seed price at index 0.
    #[inline]
    pub fn path(&self, index: usize) -> &[f64] {
        let width = self.n_steps + 1;
        &self.prices[index * width..(index + 1) * width]
    }

    /// Mutable view of one full path.
    #[inline]
    pub(crate) fn path_mut(&mut self, index: usize) -> &mut [f64] {
        let width = self.n_steps + 1;
        &mut self.prices[index * width..(index + 1) * width]
    }

    /// Terminal price of every path.
    pub fn terminal_prices(&self) -> Vec<f64> {
        (0..self.n_paths)
            .map(|p| self.prices[p * (self.n_steps + 1) + self.n_steps])
            .collect()
    }

    /// Copies out the first `cap` paths for display, so rendering cost stays
    /// flat regardless of the simulated path count.
    pub fn sample_paths(&self, cap: usize) -> Vec<Vec<f64>> {
        (0..self.n_paths.min(cap))
            .map(|p| self.path(p).to_vec())
            .collect()
    }
}
