use num_traits::Float;

use crate::{
    DomainError, EstimatorParams, Ohlc, Result, RollingSum, Series, returns::ln_ratio,
    series::collect_rolling,
};

/// Rolling Yang-Zhang volatility estimator.
///
/// Combines three return components over the window:
///
/// * overnight returns `ln(open_i / close_{i-1})`, weighted 1,
/// * close-to-close returns `ln(close_i / close_{i-1})`, weighted by the
///   bias constant `k = 0.34 / (1.34 + (window+1)/(window-1))`,
/// * per-bar Rogers-Satchell terms, weighted `1 - k`,
///
/// each aggregated as an unbiased `sum / (window - 1)` rolling variance.
/// The result is `sqrt(combined) * sqrt(trading_periods)`.
///
/// Overnight terms need a previous close, so the first bar only primes the
/// estimator and the first estimate arrives one bar later than for the
/// other estimators: at bar index `window`, after `window + 1` bars.
#[derive(Debug, Clone)]
pub struct YangZhang<T> {
    /// Shared estimator configuration
    params: EstimatorParams,
    /// Close of the previously consumed bar
    prev_close: Option<T>,
    /// Sliding sum of squared overnight log-returns
    overnight_sq: RollingSum<T>,
    /// Sliding sum of squared close-to-close log-returns
    close_close_sq: RollingSum<T>,
    /// Sliding sum of per-bar Rogers-Satchell terms
    rogers_satchell: RollingSum<T>,
    /// Bars consumed so far (including the priming bar)
    count: usize,
}

impl<T: Float + Default> YangZhang<T> {
    /// Creates a streaming estimator from validated parameters.
    pub fn new(params: EstimatorParams) -> Self {
        let window = params.window();
        Self {
            params,
            prev_close: None,
            overnight_sq: RollingSum::new(window),
            close_close_sq: RollingSum::new(window),
            rogers_satchell: RollingSum::new(window),
            count: 0,
        }
    }

    /// Returns the estimator configuration.
    pub const fn params(&self) -> &EstimatorParams {
        &self.params
    }

    /// Number of bars required before the first estimate.
    ///
    /// One more than the window: the first bar only supplies the previous
    /// close for the overnight term.
    pub const fn min_periods(&self) -> usize {
        self.params.window() + 1
    }

    /// Clears all window state, including the primed previous close.
    pub fn reset(&mut self) -> &mut Self {
        self.prev_close = None;
        self.overnight_sq.reset();
        self.close_close_sq.reset();
        self.rogers_satchell.reset();
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
    ///   bar, `None` while warming up (the priming bar plus `window - 1`
    ///   further bars), or a [`DomainError`] on non-positive prices or a
    ///   negative combined variance. Validation happens before any state
    ///   is mutated.
    pub fn next(&mut self, bar: &Ohlc<T>) -> Result<Option<T>> {
        let out_of_domain = DomainError::NonPositivePrice { index: self.count };

        let Some(prev_close) = self.prev_close else {
            // priming bar: only its close is consumed, as the first
            // overnight reference
            if bar.close <= T::zero() {
                return Err(out_of_domain.into());
            }
            self.prev_close = Some(bar.close);
            self.count = 1;
            return Ok(None);
        };

        let overnight = ln_ratio(bar.open, prev_close).ok_or(out_of_domain)?;
        let close_close = ln_ratio(bar.close, prev_close).ok_or(out_of_domain)?;
        let high_open = ln_ratio(bar.high, bar.open).ok_or(out_of_domain)?;
        let low_open = ln_ratio(bar.low, bar.open).ok_or(out_of_domain)?;
        let close_open = ln_ratio(bar.close, bar.open).ok_or(out_of_domain)?;

        self.overnight_sq.push(overnight * overnight);
        self.close_close_sq.push(close_close * close_close);
        self.rogers_satchell
            .push(high_open * (high_open - close_open) + low_open * (low_open - close_open));
        self.prev_close = Some(bar.close);
        self.count += 1;
        self.value()
    }

    /// Rolling Yang-Zhang volatility of a bar slice.
    ///
    /// Trimmed output holds `N - window` values (one fewer than the other
    /// estimators); aligned output holds `N` positions. Any domain
    /// violation aborts the whole call.
    pub fn estimate(params: EstimatorParams, bars: &[Ohlc<T>]) -> Result<Series<T>> {
        let mut estimator = Self::new(params);
        collect_rolling(bars, params.warmup(), |bar| estimator.next(bar))
    }

    /// Bias weight `k`, approaching 0.34/2.34 as the window grows.
    fn bias_weight(&self) -> Option<T> {
        let window = T::from(self.params.window())?;
        let one = T::one();
        let k_num = T::from(0.34)?;
        let k_den = T::from(1.34)? + (window + one) / (window - one);
        Some(k_num / k_den)
    }

    fn value(&self) -> Result<Option<T>> {
        let sums = self
            .overnight_sq
            .sum()
            .zip(self.close_close_sq.sum())
            .zip(self.rogers_satchell.sum());
        let Some(((overnight, close_close), rogers_satchell)) = sums else {
            return Ok(None);
        };
        let constants = self
            .bias_weight()
            .zip(T::from(self.params.window() - 1))
            .zip(T::from(self.params.trading_periods()));
        let Some(((k, denom), trading_periods)) = constants else {
            return Ok(None);
        };

        let overnight_vol = overnight / denom;
        let close_vol = close_close / denom;
        let rs_vol = rogers_satchell / denom;

        let variance = overnight_vol + k * close_vol + (T::one() - k) * rs_vol;
        if variance < T::zero() {
            return Err(DomainError::NegativeVariance {
                start: self.count - self.params.window(),
                end: self.count - 1,
            }
            .into());
        }
        Ok(Some(variance.sqrt() * trading_periods.sqrt()))
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::{VolatilityError, Warmup};

    fn sample_bars() -> [Ohlc<f64>; 6] {
        [
            Ohlc::new(100.0, 104.0, 99.0, 103.0),
            Ohlc::new(103.0, 106.0, 101.0, 102.0),
            Ohlc::new(102.0, 105.0, 100.0, 104.0),
            Ohlc::new(104.0, 108.0, 103.0, 107.0),
            Ohlc::new(107.0, 110.0, 104.0, 105.0),
            Ohlc::new(105.0, 109.0, 102.0, 108.0),
        ]
    }

    #[test]
    fn matches_reference_values() {
        let params = EstimatorParams::new(3, 252).ok();
        let Some(params) = params else {
            panic!("params are valid")
        };
        let values = YangZhang::estimate(params, &sample_bars()).map(|s| s.values());

        // first output needs window + 1 = 4 bars
        let expected = [0.6032959327, 0.6299535473, 0.7137261480];
        match values {
            Ok(values) => {
                assert_eq!(values.len(), 3);
                for (v, e) in values.iter().zip(&expected) {
                    assert_approx_eq!(v, e, 1e-9);
                }
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn smallest_window_matches_hand_computation() {
        let params = EstimatorParams::new(2, 1).ok();
        let Some(params) = params else {
            panic!("params are valid")
        };
        let values = YangZhang::estimate(params, &sample_bars()[..3]).map(|s| s.values());
        match values {
            Ok(values) => {
                assert_eq!(values.len(), 1);
                assert_approx_eq!(values[0], 0.0469509821, 1e-9);
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn first_output_index_is_the_window_length() {
        let params = EstimatorParams::new(3, 252).map(|p| p.with_warmup(Warmup::Mark));
        let Ok(params) = params else {
            panic!("params are valid")
        };
        let series = YangZhang::estimate(params, &sample_bars());
        match series {
            Ok(Series::Aligned(values)) => {
                assert_eq!(values.len(), 6);
                for (i, v) in values.iter().enumerate() {
                    assert_eq!(v.is_some(), i >= 3, "position {i}");
                }
            }
            other => panic!("expected aligned series, got {other:?}"),
        }
    }

    #[test]
    fn constant_prices_have_zero_volatility() {
        let params = EstimatorParams::new(3, 252).ok();
        let Some(params) = params else {
            panic!("params are valid")
        };
        let bars = [Ohlc::new(50.0, 50.0, 50.0, 50.0); 9];
        let values = YangZhang::estimate(params, &bars).map(|s| s.values());
        assert_eq!(values, Ok(vec![0.0; 6]));
    }

    #[test]
    fn doubling_trading_periods_scales_by_sqrt_two() {
        let bars = sample_bars();
        let one = EstimatorParams::new(3, 126).and_then(|p| YangZhang::estimate(p, &bars));
        let two = EstimatorParams::new(3, 252).and_then(|p| YangZhang::estimate(p, &bars));
        match one.map(|s| s.values()).and_then(|a| two.map(|s| (a, s.values()))) {
            Ok((a, b)) => {
                for (x, y) in a.iter().zip(&b) {
                    assert_approx_eq!(y, x * 2.0_f64.sqrt(), 1e-12);
                }
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn degenerate_window_is_rejected_before_construction() {
        // the bias weight and unbiased variances divide by window - 1
        assert_eq!(
            EstimatorParams::new(1, 252),
            Err(VolatilityError::InvalidParameter {
                name: "window",
                reason: "must be at least 2",
            })
        );
    }

    #[test]
    fn non_positive_priming_close_is_a_domain_error() {
        let params = EstimatorParams::new(2, 252).ok();
        let Some(params) = params else {
            panic!("params are valid")
        };
        let mut yz = YangZhang::new(params);
        let result = yz.next(&Ohlc::new(100.0, 104.0, 99.0, 0.0));
        assert_eq!(
            result,
            Err(VolatilityError::Domain(DomainError::NonPositivePrice {
                index: 0
            }))
        );
    }

    #[test]
    fn mid_series_zero_price_fails_loudly() {
        let params = EstimatorParams::new(2, 252).ok();
        let Some(params) = params else {
            panic!("params are valid")
        };
        let mut bars = sample_bars();
        bars[4].low = 0.0;
        let result = YangZhang::estimate(params, &bars);
        assert_eq!(
            result,
            Err(VolatilityError::Domain(DomainError::NonPositivePrice {
                index: 4
            }))
        );
    }
}
