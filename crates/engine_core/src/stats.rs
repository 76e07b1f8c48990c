//! Return statistics estimated from a historical price series.
//!
//! Converts an ordered series of positive prices into annualised drift,
//! realised volatility, and a standard error for the volatility estimate.
//! Downstream numeric code must never see NaN from here: every degenerate
//! input collapses to zeros instead.

/// Trading days per year used for annualisation.
pub const TRADING_DAYS: f64 = 252.0;

/// Annualised statistics of a log-return series.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturnStats {
    /// Annualised mean log-return.
    pub drift: f64,
    /// Annualised sample standard deviation of log-returns.
    pub volatility: f64,
    /// Chi-square-based standard error of the volatility estimate:
    /// `volatility / sqrt(2 * (n - 1))`.
    pub std_error: f64,
}

impl ReturnStats {
    /// The all-zero result returned for degenerate inputs.
    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Estimates annualised drift, realised volatility, and volatility standard
/// error from an ordered price series.
///
/// Non-finite and non-positive prices are dropped before computing
/// log-returns, and non-finite log-returns are dropped afterwards. Fewer
/// than two valid prices, or fewer than two valid returns, yields exactly
/// [`ReturnStats::zero`] rather than an error.
///
/// # Examples
///
/// ```
/// use engine_core::estimate_return_statistics;
///
/// let prices = [100.0, 101.0, 99.5, 102.0, 103.0];
/// let stats = estimate_return_statistics(&prices);
/// assert!(stats.volatility > 0.0);
/// assert!(stats.std_error > 0.0);
///
/// // Degenerate input collapses to zeros.
/// let empty = estimate_return_statistics(&[100.0]);
/// assert_eq!(empty.drift, 0.0);
/// ```
pub fn estimate_return_statistics(prices: &[f64]) -> ReturnStats {
    let valid: Vec<f64> = prices
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();

    if valid.len() < 2 {
        tracing::warn!(
            n_prices = valid.len(),
            "fewer than 2 valid prices, returning zero statistics"
        );
        return ReturnStats::zero();
    }

    let log_returns: Vec<f64> = valid
        .windows(2)
        .map(|w| (w[1] / w[0]).ln())
        .filter(|r| r.is_finite())
        .collect();

    let n = log_returns.len();
    if n < 2 {
        tracing::warn!(
            n_returns = n,
            "fewer than 2 valid log-returns, returning zero statistics"
        );
        return ReturnStats::zero();
    }

    let mean = log_returns.iter().sum::<f64>() / n as f64;
    // Sample variance (ddof = 1), matching the convention of the estimator
    // the stderr formula assumes.
    let var = log_returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);

    let drift = mean * TRADING_DAYS;
    let volatility = var.sqrt() * TRADING_DAYS.sqrt();
    let std_error = volatility / (2.0 * ((n - 1).max(1)) as f64).sqrt();

    ReturnStats {
        drift,
        volatility,
        std_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_series_returns_zero() {
        assert_eq!(estimate_return_statistics(&[]), ReturnStats::zero());
    }

    #[test]
    fn test_single_price_returns_zero() {
        assert_eq!(estimate_return_statistics(&[100.0]), ReturnStats::zero());
    }

    #[test]
    fn test_two_prices_returns_zero() {
        // Two prices give a single return, which is below the two-return
        // minimum for a sample standard deviation.
        assert_eq!(
            estimate_return_statistics(&[100.0, 101.0]),
            ReturnStats::zero()
        );
    }

    #[test]
    fn test_non_finite_prices_filtered() {
        let stats = estimate_return_statistics(&[100.0, f64::NAN, f64::INFINITY, -5.0, 0.0]);
        assert_eq!(stats, ReturnStats::zero());
    }

    #[test]
    fn test_constant_prices_zero_volatility() {
        let stats = estimate_return_statistics(&[100.0, 100.0, 100.0, 100.0]);
        assert_eq!(stats.drift, 0.0);
        assert_eq!(stats.volatility, 0.0);
        assert_eq!(stats.std_error, 0.0);
    }

    #[test]
    fn test_known_series() {
        // Returns: ln(1.01), ln(1.01), ln(1.01) -- constant, so vol = 0.
        let prices = [100.0, 101.0, 102.01, 103.0301];
        let stats = estimate_return_statistics(&prices);
        assert_relative_eq!(stats.drift, (1.01_f64).ln() * 252.0, epsilon = 1e-10);
        assert_relative_eq!(stats.volatility, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_alternating_series_positive_volatility() {
        let prices = [100.0, 110.0, 100.0, 110.0, 100.0];
        let stats = estimate_return_statistics(&prices);
        assert!(stats.volatility > 0.0);
        // drift averages up/down moves: ln(1.1) + ln(1/1.1) pairs cancel.
        assert_relative_eq!(stats.drift, 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            stats.std_error,
            stats.volatility / (2.0_f64 * 3.0).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_never_nan() {
        let inputs: [&[f64]; 4] = [
            &[],
            &[f64::NAN],
            &[1e-300, 1e300, 1e-300],
            &[42.0, 42.0],
        ];
        for prices in inputs {
            let stats = estimate_return_statistics(prices);
            assert!(stats.drift.is_finite());
            assert!(stats.volatility.is_finite());
            assert!(stats.std_error.is_finite());
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Arbitrary input, including NaN, infinities, and negative
            /// prices, never produces a non-finite statistic.
            #[test]
            fn prop_statistics_always_finite(
                prices in proptest::collection::vec(proptest::num::f64::ANY, 0..64),
            ) {
                let stats = estimate_return_statistics(&prices);
                prop_assert!(stats.drift.is_finite());
                prop_assert!(stats.volatility.is_finite());
                prop_assert!(stats.std_error.is_finite());
            }

            /// Volatility and its standard error are never negative.
            #[test]
            fn prop_volatility_non_negative(
                prices in proptest::collection::vec(1e-6..1e6f64, 0..64),
            ) {
                let stats = estimate_return_statistics(&prices);
                prop_assert!(stats.volatility >= 0.0);
                prop_assert!(stats.std_error >= 0.0);
            }
        }
    }
}
