use num_traits::Float;

use crate::{
    DomainError, EstimatorParams, Ohlc, Result, RollingSum, Series, returns::ln_ratio,
    series::collect_rolling,
};

/// Rolling Parkinson volatility estimator.
///
/// Estimates volatility from the high/low range alone: per bar the squared
/// log range `ln(high/low)^2` is accumulated, and each full window yields
///
/// `sqrt(trading_periods * mean / (4 * ln 2))`
///
/// The range captures intraday movement that close-to-close estimators
/// miss, at the cost of assuming no drift and no opening jumps.
///
/// # Examples
///
/// ```
/// # use ta_volatility::{EstimatorParams, Ohlc, Parkinson};
/// # use assert_approx_eq::assert_approx_eq;
/// let params = EstimatorParams::new(2, 1)?;
/// let mut parkinson: Parkinson<f64> = Parkinson::new(params);
///
/// assert_eq!(parkinson.next(&Ohlc::new(100.0, 110.0, 90.0, 105.0))?, None);
/// let vol = parkinson.next(&Ohlc::new(105.0, 115.0, 95.0, 100.0))?;
/// match vol {
///     Some(v) => assert_approx_eq!(v, 0.1176631, 1e-6),
///     None => unreachable!("second bar completes the window"),
/// }
/// # Ok::<(), ta_volatility::VolatilityError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Parkinson<T> {
    /// Shared estimator configuration
    params: EstimatorParams,
    /// Sliding sum of squared high/low log-ratios
    range_sq: RollingSum<T>,
    /// Bars consumed so far, used to report offending indices
    count: usize,
}

impl<T: Float + Default> Parkinson<T> {
    /// Creates a streaming estimator from validated parameters.
    pub fn new(params: EstimatorParams) -> Self {
        Self {
            params,
            range_sq: RollingSum::new(params.window()),
            count: 0,
        }
    }

    /// Returns the estimator configuration.
    pub const fn params(&self) -> &EstimatorParams {
        &self.params
    }

    /// Number of bars required before the first estimate.
    pub const fn min_periods(&self) -> usize {
        self.params.window()
    }

    /// Clears all window state.
    pub fn reset(&mut self) -> &mut Self {
        self.range_sq.reset();
        self.count = 0;
        self
    }

    /// Pushes one bar and returns the estimate once the window is full.
    ///
    /// # Arguments
    ///
    /// * `bar` - The next chronological bar
    ///
    /// # Returns
    ///
    /// * `Result<Option<T>>` - The volatility for the window ending at this
    ///   bar, `None` during warmup, or `NonPositivePrice` if `high` or
    ///   `low` is zero or negative (state is left untouched in that case)
    pub fn next(&mut self, bar: &Ohlc<T>) -> Result<Option<T>> {
        let range = ln_ratio(bar.high, bar.low)
            .ok_or(DomainError::NonPositivePrice { index: self.count })?;
        self.range_sq.push(range * range);
        self.count += 1;
        Ok(self.value())
    }

    /// Rolling Parkinson volatility of a bar slice.
    ///
    /// Output shape follows `params.warmup()`: trimmed output holds
    /// `N - window + 1` values, aligned output holds `N` positions. Any
    /// domain violation aborts the whole call.
    pub fn estimate(params: EstimatorParams, bars: &[Ohlc<T>]) -> Result<Series<T>> {
        let mut estimator = Self::new(params);
        collect_rolling(bars, params.warmup(), |bar| estimator.next(bar))
    }

    fn value(&self) -> Option<T> {
        let sum = self.range_sq.sum()?;
        let window = T::from(self.params.window())?;
        let trading_periods = T::from(self.params.trading_periods())?;
        let _4 = T::from(4.0)?;
        let scale = _4 * T::from(2.0)?.ln();
        Some((trading_periods * sum / window / scale).sqrt())
    }
}
