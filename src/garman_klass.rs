use num_traits::Float;

use crate::{
    DomainError, EstimatorParams, Ohlc, Result, RollingSum, Series, returns::ln_ratio,
    series::collect_rolling,
};

/// Rolling Garman-Klass volatility estimator.
///
/// Extends the range-based Parkinson estimator with an open/close term:
/// per bar the contribution is
///
/// `0.5 * ln(high/low)^2 - (2 ln 2 - 1) * ln(close/open)^2`
///
/// and each full window yields `sqrt(trading_periods * mean)`.
///
/// The open/close term is subtracted, so a pathological window (tiny
/// high/low spread against a large open/close move, which cannot happen for
/// bars honoring `low <= open, close <= high`) can drive the windowed mean
/// negative. That surfaces as [`DomainError::NegativeVariance`] naming the
/// window, never as a NaN.
#[derive(Debug, Clone)]
pub struct GarmanKlass<T> {
    /// Shared estimator configuration
    params: EstimatorParams,
    /// Sliding sum of per-bar Garman-Klass terms
    terms: RollingSum<T>,
    /// Bars consumed so far, used to report offending indices
    count: usize,
}

impl<T: Float + Default> GarmanKlass<T> {
    /// Creates a streaming estimator from validated parameters.
    pub fn new(params: EstimatorParams) -> Self {
        Self {
            params,
            terms: RollingSum::new(params.window()),
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
        self.terms.reset();
        self.count = 0;
        self
    }

    /// Pushes one bar and returns the estimate once the window is full.
    ///
    /// All four prices sit under a logarithm, so any non-positive field is
    /// a [`DomainError::NonPositivePrice`]; validation happens before any
    /// state is mutated. A negative windowed mean is reported as
    /// [`DomainError::NegativeVariance`] for the window ending at this bar;
    /// the window state itself stays consistent, so streaming may continue
    /// past it deliberately.
    pub fn next(&mut self, bar: &Ohlc<T>) -> Result<Option<T>> {
        let out_of_domain = DomainError::NonPositivePrice { index: self.count };
        let range = ln_ratio(bar.high, bar.low).ok_or(out_of_domain)?;
        let body = ln_ratio(bar.close, bar.open).ok_or(out_of_domain)?;

        let Some(term) = Self::term(range, body) else {
            return Ok(None);
        };
        self.terms.push(term);
        self.count += 1;
        self.value()
    }

    /// Rolling Garman-Klass volatility of a bar slice.
    ///
    /// Output shape follows `params.warmup()`; any domain violation aborts
    /// the whole call.
    pub fn estimate(params: EstimatorParams, bars: &[Ohlc<T>]) -> Result<Series<T>> {
        let mut estimator = Self::new(params);
        collect_rolling(bars, params.warmup(), |bar| estimator.next(bar))
    }

    fn term(range: T, body: T) -> Option<T> {
        let half = T::from(0.5)?;
        let drift_coeff = T::from(2.0)? * T::from(2.0)?.ln() - T::one();
        Some(half * range * range - drift_coeff * body * body)
    }

    fn value(&self) -> Result<Option<T>> {
        let Some(sum) = self.terms.sum() else {
            return Ok(None);
        };
        let Some((window, trading_periods)) = T::from(self.params.window())
            .zip(T::from(self.params.trading_periods()))
        else {
            return Ok(None);
        };

        let variance = trading_periods * sum / window;
        if variance < T::zero() {
            return Err(DomainError::NegativeVariance {
                start: self.count - self.params.window(),
                end: self.count - 1,
            }
            .into());
        }
        Ok(Some(variance.sqrt()))
    }
}
