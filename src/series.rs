use alloc::vec::Vec;

use crate::{Ohlc, Result, Warmup};

/// Output of a batch estimation, shaped by [`Warmup`].
///
/// * [`Series::Trimmed`] - warmup positions omitted; the first element
///   aligns with the end of the first full window of the input.
/// * [`Series::Aligned`] - same length as the input; warmup positions are
///   `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Series<T> {
    /// Warmup positions omitted
    Trimmed(Vec<T>),
    /// Input-aligned, warmup positions marked `None`
    Aligned(Vec<Option<T>>),
}

impl<T: Copy> Series<T> {
    /// Returns the number of positions held, including `None` markers.
    pub fn len(&self) -> usize {
        match self {
            Self::Trimmed(values) => values.len(),
            Self::Aligned(values) => values.len(),
        }
    }

    /// Returns the computed values with warmup markers compacted away.
    pub fn values(&self) -> Vec<T> {
        match self {
            Self::Trimmed(values) => values.clone(),
            Self::Aligned(values) => values.iter().copied().flatten().collect(),
        }
    }

    /// Returns the value at an input-aligned position, if computed.
    ///
    /// For [`Series::Trimmed`] the caller's index is relative to the first
    /// full window; for [`Series::Aligned`] it is the bar index.
    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            Self::Trimmed(values) => values.get(index).copied(),
            Self::Aligned(values) => values.get(index).copied().flatten(),
        }
    }
}

/// Drives a streaming estimator over a bar slice, shaping the output per
/// the warmup policy. Any error from `step` aborts the whole batch.
pub(crate) fn collect_rolling<T, F>(bars: &[Ohlc<T>], warmup: Warmup, mut step: F) -> Result<Series<T>>
where
    F: FnMut(&Ohlc<T>) -> Result<Option<T>>,
{
    match warmup {
        Warmup::Trim => {
            let mut out = Vec::with_capacity(bars.len());
            for bar in bars {
                if let Some(value) = step(bar)? {
                    out.push(value);
                }
            }
            Ok(Series::Trimmed(out))
        }
        Warmup::Mark => {
            let mut out = Vec::with_capacity(bars.len());
            for bar in bars {
                out.push(step(bar)?);
            }
            Ok(Series::Aligned(out))
        }
    }
}
