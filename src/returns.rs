use num_traits::Float;

use alloc::vec::Vec;

use crate::DomainError;

/// Natural log of `num / den`, or `None` if either price is non-positive.
///
/// Every estimator funnels its ratios through here so the numeric edge
/// (undefined logarithm, division by zero) is handled in exactly one place.
/// Callers attach the bar index when mapping `None` to a
/// [`DomainError::NonPositivePrice`].
#[inline]
pub(crate) fn ln_ratio<T: Float>(num: T, den: T) -> Option<T> {
    (num > T::zero() && den > T::zero()).then(|| (num / den).ln())
}

/// Elementwise natural log of the ratio of two aligned price slices.
///
/// # Arguments
///
/// * `numerators` - Prices forming the ratio numerators
/// * `denominators` - Prices forming the ratio denominators, same length
///
/// # Returns
///
/// * `Result<Vec<T>, DomainError>` - The log-returns, or
///   `NonPositivePrice` at the first aligned position where either input
///   is zero or negative
///
/// # Examples
///
/// ```
/// # use ta_volatility::log_returns;
/// # use assert_approx_eq::assert_approx_eq;
/// let highs = [110.0_f64, 115.0];
/// let lows = [90.0, 95.0];
///
/// let returns = log_returns(&highs, &lows)?;
/// assert_approx_eq!(returns[0], 0.2006707, 1e-6);
/// assert_approx_eq!(returns[1], 0.1910552, 1e-6);
///
/// assert!(log_returns(&[100.0], &[0.0]).is_err());
/// # Ok::<(), ta_volatility::DomainError>(())
/// ```
pub fn log_returns<T: Float>(
    numerators: &[T],
    denominators: &[T],
) -> core::result::Result<Vec<T>, DomainError> {
    numerators
        .iter()
        .zip(denominators)
        .enumerate()
        .map(|(index, (&num, &den))| {
            ln_ratio(num, den).ok_or(DomainError::NonPositivePrice { index })
        })
        .collect()
}
