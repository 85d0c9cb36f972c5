//! Running arithmetic means.
//!
//! [`MeanAccumulator`] sums fixed-width vectors one at a time and reports
//! the per-component mean of everything pushed so far. Every pushed vector
//! carries the same weight, which is what grouped averaging relies on: a
//! group contributes exactly one vector to the next stage no matter how
//! many rows it was built from.

use std::iter;

/// Accumulates `[f64; N]` vectors and yields their component-wise mean.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanAccumulator<const N: usize> {
    sum: [f64; N],
    count: usize,
}

impl<const N: usize> Default for MeanAccumulator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MeanAccumulator<N> {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sum: [0.0; N],
            count: 0,
        }
    }

    /// Adds one vector with unit weight.
    pub fn push(&mut self, values: &[f64; N]) {
        for (sum, value) in iter::zip(&mut self.sum, values) {
            *sum += value;
        }
        self.count += 1;
    }

    /// Number of vectors pushed so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the component-wise mean.
    ///
    /// # Returns
    ///
    /// * `Some(mean)` - if at least one vector was pushed
    /// * `None` - if the accumulator is empty
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> Option<[f64; N]> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(self.sum.map(|sum| sum / n))
    }
}

/// Arithmetic mean of scalar values, `None` for an empty input.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
