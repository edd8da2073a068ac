use crate::{Result, VolatilityError};

/// How estimate positions before the first full window are represented.
///
/// Spelled out as an explicit option so the shape of [`crate::Series`] a
/// batch call returns is visible at the call site. This only governs
/// leading warmup positions; a domain violation anywhere in the series
/// always fails the whole call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Warmup {
    /// Omit warmup positions; the output starts at the first full window.
    #[default]
    Trim,
    /// Keep the input length and mark warmup positions as `None`.
    Mark,
}

/// Immutable configuration shared by all volatility estimators.
///
/// Validated on construction: `window` must be at least 2 (the Yang-Zhang
/// bias weight and unbiased variances divide by `window - 1`) and
/// `trading_periods` must be positive. Estimators built from a valid
/// `EstimatorParams` cannot fail on configuration grounds afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorParams {
    /// Rolling lookback length in bars
    window: usize,
    /// Annualization scale, e.g. 252 for daily bars
    trading_periods: usize,
    /// Warmup representation for batch estimation
    warmup: Warmup,
}

impl EstimatorParams {
    /// Creates a validated parameter set with warmup positions trimmed.
    ///
    /// # Arguments
    ///
    /// * `window` - The rolling lookback length, at least 2
    /// * `trading_periods` - The annualization scale factor, positive
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The parameters, or `InvalidParameter` on violation
    ///
    /// # Examples
    ///
    /// ```
    /// # use ta_volatility::EstimatorParams;
    /// assert!(EstimatorParams::new(30, 252).is_ok());
    /// assert!(EstimatorParams::new(1, 252).is_err());
    /// assert!(EstimatorParams::new(30, 0).is_err());
    /// ```
    pub const fn new(window: usize, trading_periods: usize) -> Result<Self> {
        if window < 2 {
            return Err(VolatilityError::InvalidParameter {
                name: "window",
                reason: "must be at least 2",
            });
        }
        if trading_periods == 0 {
            return Err(VolatilityError::InvalidParameter {
                name: "trading_periods",
                reason: "must be positive",
            });
        }
        Ok(Self {
            window,
            trading_periods,
            warmup: Warmup::Trim,
        })
    }

    /// Returns a copy with the given warmup representation.
    pub const fn with_warmup(mut self, warmup: Warmup) -> Self {
        self.warmup = warmup;
        self
    }

    /// Returns the rolling lookback length.
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Returns the annualization scale factor.
    pub const fn trading_periods(&self) -> usize {
        self.trading_periods
    }

    /// Returns the warmup representation.
    pub const fn warmup(&self) -> Warmup {
        self.warmup
    }
}

impl Default for EstimatorParams {
    /// A 30-bar window annualized over 252 trading periods, warmup trimmed.
    fn default() -> Self {
        Self {
            window: 30,
            trading_periods: 252,
            warmup: Warmup::Trim,
        }
    }
}
