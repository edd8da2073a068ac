use num_traits::Float;

use crate::Kbn;
use crate::utils::RingBuffer;

/// A sliding-window sum with compensated accumulation.
///
/// Each push costs O(1): the evicted value is subtracted from the running
/// total and the new value added, so a whole series is processed in O(N)
/// instead of resumming every window. The running total uses
/// Kahan-Babuska-Neumaier summation to bound the floating-point error of
/// the incremental add/subtract cycle; [`RollingSum::recompute`] resums the
/// buffered window for callers that stream long enough to worry about the
/// residual drift anyway.
#[derive(Debug, Clone)]
pub struct RollingSum<T> {
    /// Window contents, needed to subtract evicted values
    buf: RingBuffer<T>,
    /// Compensated running total of the window
    sum: Kbn<T>,
}

impl<T: Float + Default> RollingSum<T> {
    /// Creates a sliding sum over the given window length.
    pub fn new(window: usize) -> Self {
        Self {
            buf: RingBuffer::new(window),
            sum: Kbn::default(),
        }
    }

    /// Pushes a value, sliding the window forward by one position.
    pub fn push(&mut self, value: T) {
        if let Some(evicted) = self.buf.push(value) {
            self.sum -= evicted;
        }
        self.sum += value;
    }

    /// Returns the window sum, or `None` until the window is full.
    #[inline]
    pub fn sum(&self) -> Option<T> {
        self.is_ready().then(|| self.sum.total())
    }

    /// Returns `true` once a full window has been accumulated.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.buf.is_full()
    }

    /// Returns the number of values accumulated so far, capped at the window.
    #[inline]
    pub const fn count(&self) -> usize {
        self.buf.len()
    }

    /// Clears the window and the running total.
    pub fn reset(&mut self) {
        self.buf.reset();
        self.sum = Kbn::default();
    }

    /// Resums the buffered window from scratch, discarding drift that the
    /// incremental subtract/add cycle may have accumulated.
    pub fn recompute(&mut self) {
        self.sum = Kbn::default();
        for &value in self.buf.iter() {
            self.sum += value;
        }
    }
}
