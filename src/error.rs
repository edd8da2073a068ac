use thiserror::Error;

/// Convenience alias for fallible estimator operations.
pub type Result<T> = core::result::Result<T, VolatilityError>;

/// Errors surfaced by the estimators in this crate.
///
/// Both variants are deterministic input errors, never transient failures:
/// retrying the same call with the same data yields the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VolatilityError {
    /// A configuration value was rejected before any bar was processed.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the rejected parameter
        name: &'static str,
        /// Why the value was rejected
        reason: &'static str,
    },
    /// A bar or window produced a value outside the estimator's numeric domain.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Numeric domain violations detected while processing bars.
///
/// These indicate corrupt input data. They abort batch estimation
/// immediately; no partial output is returned past the offending position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A price required under a logarithm was zero or negative.
    #[error("non-positive price at bar {index}: log-return is undefined")]
    NonPositivePrice {
        /// Position of the offending bar in the input series
        index: usize,
    },
    /// A windowed variance went negative before a square root.
    ///
    /// Possible for Garman-Klass (and, with invariant-violating bars,
    /// Yang-Zhang) when the open/close move dwarfs the high/low spread.
    #[error("negative variance over bars {start}..={end}")]
    NegativeVariance {
        /// First bar of the offending window
        start: usize,
        /// Last bar of the offending window
        end: usize,
    },
}
