use num_traits::Float;

use crate::{Ohlc, Result, VolatilityError};

/// One directional-movement reading: ADX with its two DI components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalMovement<T> {
    /// Average directional index, 0-100
    pub adx: T,
    /// Positive directional indicator, 0-100
    pub plus_di: T,
    /// Negative directional indicator, 0-100
    pub minus_di: T,
}

/// Trend-strength trading signal derived from directional movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendSignal {
    /// Trending with upward pressure: `+DI > -DI` above the ADX threshold
    Long,
    /// Trending with downward pressure: `-DI > +DI` above the ADX threshold
    Short,
    /// No trend strong enough to act on
    Neutral,
}

/// Previous bar's prices, kept for true-range and directional moves.
#[derive(Debug, Clone, Copy)]
struct PrevBar<T> {
    high: T,
    low: T,
    close: T,
}

/// Wilder-smoothed running aggregates, available once seeded.
#[derive(Debug, Clone, Copy)]
struct Smoothed<T> {
    true_range: T,
    plus_dm: T,
    minus_dm: T,
}

/// Streaming average directional index (Wilder's ADX with ±DI).
///
/// Per bar the true range and the +DM/-DM directional moves are fed into
/// Wilder smoothing, seeded by the sum of the first `period` values. The
/// DI lines are the smoothed directional moves as a percentage of smoothed
/// true range; their normalized spread (DX) is smoothed the same way to
/// produce ADX. The first reading therefore arrives at bar index
/// `2 * period - 1`.
///
/// A flat market degrades gracefully: zero smoothed true range or a zero
/// DI sum yield zero readings, never a division error.
#[derive(Debug, Clone)]
pub struct Adx<T> {
    /// Smoothing period
    period: usize,
    /// Previous bar, `None` before the first bar
    prev: Option<PrevBar<T>>,
    /// Seed accumulators for the first `period` true ranges and moves
    seed: Smoothed<T>,
    /// Number of seeded values so far
    seed_len: usize,
    /// Running Wilder aggregates once seeded
    smoothed: Option<Smoothed<T>>,
    /// Seed accumulator for the first `period` DX values
    dx_sum: T,
    /// Number of seeded DX values so far
    dx_len: usize,
    /// Current ADX once seeded
    adx: Option<T>,
}

impl<T: Float> Adx<T> {
    /// Creates a streaming ADX with the given smoothing period.
    ///
    /// # Arguments
    ///
    /// * `period` - The Wilder smoothing period, at least 1
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The indicator, or `InvalidParameter` for a zero
    ///   period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(VolatilityError::InvalidParameter {
                name: "period",
                reason: "must be positive",
            });
        }
        let zero = Smoothed {
            true_range: T::zero(),
            plus_dm: T::zero(),
            minus_dm: T::zero(),
        };
        Ok(Self {
            period,
            prev: None,
            seed: zero,
            seed_len: 0,
            smoothed: None,
            dx_sum: T::zero(),
            dx_len: 0,
            adx: None,
        })
    }

    /// Returns the smoothing period.
    pub const fn period(&self) -> usize {
        self.period
    }

    /// Number of bars required before the first reading.
    pub const fn min_periods(&self) -> usize {
        2 * self.period
    }

    /// Clears all smoothing state.
    pub fn reset(&mut self) -> &mut Self {
        self.prev = None;
        self.seed = Smoothed {
            true_range: T::zero(),
            plus_dm: T::zero(),
            minus_dm: T::zero(),
        };
        self.seed_len = 0;
        self.smoothed = None;
        self.dx_sum = T::zero();
        self.dx_len = 0;
        self.adx = None;
        self
    }

    /// Pushes one bar and returns the reading once ADX is seeded.
    pub fn next(&mut self, bar: &Ohlc<T>) -> Option<DirectionalMovement<T>> {
        let prev = self.prev.replace(PrevBar {
            high: bar.high,
            low: bar.low,
            close: bar.close,
        })?;

        let zero = T::zero();
        let true_range = bar.true_range(prev.close);
        let up = bar.high - prev.high;
        let down = prev.low - bar.low;
        let plus_dm = if up > down && up > zero { up } else { zero };
        let minus_dm = if down > up && down > zero { down } else { zero };

        let n = T::from(self.period)?;
        match self.smoothed.as_mut() {
            Some(smoothed) => {
                smoothed.true_range = smoothed.true_range - smoothed.true_range / n + true_range;
                smoothed.plus_dm = smoothed.plus_dm - smoothed.plus_dm / n + plus_dm;
                smoothed.minus_dm = smoothed.minus_dm - smoothed.minus_dm / n + minus_dm;
            }
            None => {
                self.seed.true_range = self.seed.true_range + true_range;
                self.seed.plus_dm = self.seed.plus_dm + plus_dm;
                self.seed.minus_dm = self.seed.minus_dm + minus_dm;
                self.seed_len += 1;
                if self.seed_len < self.period {
                    return None;
                }
                self.smoothed = Some(self.seed);
            }
        }
        let smoothed = self.smoothed.as_ref()?;

        let hundred = T::from(100.0)?;
        let (plus_di, minus_di) = if smoothed.true_range > zero {
            (
                hundred * smoothed.plus_dm / smoothed.true_range,
                hundred * smoothed.minus_dm / smoothed.true_range,
            )
        } else {
            (zero, zero)
        };
        let di_sum = plus_di + minus_di;
        let dx = if di_sum > zero {
            hundred * (plus_di - minus_di).abs() / di_sum
        } else {
            zero
        };

        let adx = match self.adx {
            Some(prev_adx) => (prev_adx * (n - T::one()) + dx) / n,
            None => {
                self.dx_sum = self.dx_sum + dx;
                self.dx_len += 1;
                if self.dx_len < self.period {
                    return None;
                }
                self.dx_sum / n
            }
        };
        self.adx = Some(adx);

        Some(DirectionalMovement {
            adx,
            plus_di,
            minus_di,
        })
    }
}

/// Trend-strength signal: directional movement gated by an ADX threshold.
///
/// Emits [`TrendSignal::Long`] when `+DI > -DI` with ADX above the
/// threshold, [`TrendSignal::Short`] when `-DI > +DI` with ADX above the
/// threshold, and [`TrendSignal::Neutral`] otherwise (including all of the
/// ADX warmup). The default threshold is 25, the customary cutoff between
/// a ranging and a trending market.
#[derive(Debug, Clone)]
pub struct TrendStrength<T> {
    /// Underlying directional-movement indicator
    adx: Adx<T>,
    /// Minimum ADX for a non-neutral signal
    threshold: T,
}

impl<T: Float> TrendStrength<T> {
    /// Creates a trend-strength signal with the default threshold of 25.
    pub fn new(period: usize) -> Result<Self> {
        let threshold = T::from(25.0).ok_or(VolatilityError::InvalidParameter {
            name: "threshold",
            reason: "default threshold is not representable",
        })?;
        Ok(Self {
            adx: Adx::new(period)?,
            threshold,
        })
    }

    /// Returns a copy with the given ADX threshold.
    pub fn with_threshold(mut self, threshold: T) -> Self {
        self.threshold = threshold;
        self
    }

    /// Number of bars required before the first non-warmup signal.
    pub const fn min_periods(&self) -> usize {
        self.adx.min_periods()
    }

    /// Clears all smoothing state.
    pub fn reset(&mut self) -> &mut Self {
        self.adx.reset();
        self
    }

    /// Pushes one bar and returns the signal once ADX is available.
    pub fn next(&mut self, bar: &Ohlc<T>) -> Option<TrendSignal> {
        let dm = self.adx.next(bar)?;
        if dm.adx <= self.threshold {
            return Some(TrendSignal::Neutral);
        }
        Some(if dm.plus_di > dm.minus_di {
            TrendSignal::Long
        } else if dm.minus_di > dm.plus_di {
            TrendSignal::Short
        } else {
            TrendSignal::Neutral
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn trending_up(len: usize) -> alloc::vec::Vec<Ohlc<f64>> {
        (0..len)
            .map(|i| {
                let base = 100.0 + i as f64;
                Ohlc::new(base, base + 2.0, base - 1.0, base + 1.5)
            })
            .collect()
    }

    fn trending_down(len: usize) -> alloc::vec::Vec<Ohlc<f64>> {
        (0..len)
            .map(|i| {
                let base = 100.0 - i as f64;
                Ohlc::new(base, base + 1.0, base - 2.0, base - 1.5)
            })
            .collect()
    }

    #[test]
    fn first_reading_arrives_after_two_periods() {
        let adx = Adx::new(3).ok();
        let Some(mut adx) = adx else {
            panic!("period 3 is valid")
        };
        let mut first = None;
        for (i, bar) in trending_up(10).iter().enumerate() {
            if adx.next(bar).is_some() {
                first = Some(i);
                break;
            }
        }
        assert_eq!(first, Some(adx.min_periods() - 1));
    }

    #[test]
    fn monotone_uptrend_saturates_adx() {
        let adx = Adx::new(3).ok();
        let Some(mut adx) = adx else {
            panic!("period 3 is valid")
        };
        let mut last = None;
        for bar in trending_up(10).iter() {
            if let Some(dm) = adx.next(bar) {
                assert!((0.0..=100.0).contains(&dm.adx));
                last = Some(dm);
            }
        }
        match last {
            Some(dm) => {
                // all movement is upward: -DM never fires, DX pegs at 100
                assert_approx_eq!(dm.adx, 100.0, 1e-9);
                assert_approx_eq!(dm.plus_di, 100.0 / 3.0, 1e-9);
                assert_approx_eq!(dm.minus_di, 0.0, 1e-9);
            }
            None => panic!("ten bars are enough for a period-3 reading"),
        }
    }

    #[test]
    fn uptrend_signals_long_and_downtrend_short() {
        let up = TrendStrength::new(3).ok();
        let Some(mut up) = up else {
            panic!("period 3 is valid")
        };
        let mut last = None;
        for bar in trending_up(10).iter() {
            if let Some(signal) = up.next(bar) {
                last = Some(signal);
            }
        }
        assert_eq!(last, Some(TrendSignal::Long));

        let down = TrendStrength::new(3).ok();
        let Some(mut down) = down else {
            panic!("period 3 is valid")
        };
        let mut last = None;
        for bar in trending_down(10).iter() {
            if let Some(signal) = down.next(bar) {
                last = Some(signal);
            }
        }
        assert_eq!(last, Some(TrendSignal::Short));
    }

    #[test]
    fn flat_market_is_neutral_without_division_errors() {
        let strength = TrendStrength::new(2).ok();
        let Some(mut strength) = strength else {
            panic!("period 2 is valid")
        };
        let bar = Ohlc::new(50.0, 50.0, 50.0, 50.0);
        let mut signals = alloc::vec::Vec::new();
        for _ in 0..8 {
            if let Some(signal) = strength.next(&bar) {
                signals.push(signal);
            }
        }
        assert!(!signals.is_empty());
        assert!(signals.iter().all(|s| *s == TrendSignal::Neutral));
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(Adx::<f64>::new(0).is_err());
        assert!(TrendStrength::<f64>::new(0).is_err());
    }

    #[test]
    fn reset_restarts_the_warmup() {
        let adx = Adx::new(2).ok();
        let Some(mut adx) = adx else {
            panic!("period 2 is valid")
        };
        let bars = trending_up(6);
        for bar in &bars {
            let _ = adx.next(bar);
        }
        adx.reset();
        assert_eq!(adx.next(&bars[0]), None);
    }
}
