//! Validated time-series container.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DataError;

/// An ordered univariate time series.
///
/// Timestamps are strictly increasing with no duplicates; both invariants are
/// checked at construction and the series is immutable afterwards. Timestamps
/// and values are stored as parallel vectors so the numeric payload can be
/// handed to model fitting as a plain `&[f64]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series from (timestamp, value) observations.
    ///
    /// Returns [`DataError::Empty`] for an empty input and
    /// [`DataError::Unordered`] when timestamps are not strictly increasing.
    pub fn new(points: Vec<(DateTime<Utc>, f64)>) -> Result<Self, DataError> {
        if points.is_empty() {
            return Err(DataError::Empty);
        }

        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(DataError::Unordered { index: i + 1 });
            }
        }

        let (timestamps, values) = points.into_iter().unzip();
        Ok(Self { timestamps, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Copy out the half-open index range `[start, end)` as a new series.
    ///
    /// Panics if the range is out of bounds; callers derive ranges from
    /// `len()` so an out-of-range slice is a programming error.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        }
    }
}
