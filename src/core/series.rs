//! Ordered, immutable sequence of observations.

use crate::error::{ForecastError, Result};

/// Fraction of the observations assigned to the training segment.
pub const TRAIN_FRACTION: f64 = 0.8;

/// A univariate series of numeric observations.
///
/// The values are never mutated once constructed; every candidate fit in a
/// search reads the same slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Vec<f64>,
}

impl Series {
    /// Create a series, rejecting empty input and non-finite observations.
    pub fn try_new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::NonFiniteValue { index });
        }
        Ok(Self { values })
    }

    /// Observation values in chronological order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Training length of the 80/20 split of a series of `n` observations.
///
/// Computed as `floor((n - 1) * 0.8)`. Reported with every search but not
/// used to score candidates.
pub fn train_length(n: usize) -> usize {
    (n.saturating_sub(1) as f64 * TRAIN_FRACTION) as usize
}
