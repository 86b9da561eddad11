//! Deterministic train/test partitioning.

use crate::models::{DataError, TimeSeries};

/// Fraction of observations assigned to the training prefix.
pub const TRAIN_FRACTION: f64 = 0.8;

/// Split a series into a training prefix and an evaluation suffix.
///
/// The split point is `floor(0.8 * len)`; no randomness is involved. Fails
/// when the series is too short to leave both partitions non-empty.
pub fn train_test_split(series: &TimeSeries) -> Result<(TimeSeries, TimeSeries), DataError> {
    let len = series.len();
    if len < 2 {
        return Err(DataError::Insufficient {
            required: 2,
            actual: len,
        });
    }

    let train_len = (TRAIN_FRACTION * len as f64).floor() as usize;
    if train_len == 0 || train_len == len {
        return Err(DataError::Insufficient {
            required: 2,
            actual: len,
        });
    }

    Ok((series.slice(0, train_len), series.slice(train_len, len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(n: usize) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimeSeries::new(
            (0..n)
                .map(|i| (start + Duration::days(i as i64), i as f64))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_split_lengths_for_all_small_sizes() {
        for len in 2..=200 {
            let (train, test) = train_test_split(&series(len)).unwrap();
            assert_eq!(train.len() + test.len(), len);
            assert_eq!(train.len(), (0.8 * len as f64).floor() as usize);
            assert!(!train.is_empty());
            assert!(!test.is_empty());
        }
    }

    #[test]
    fn test_split_preserves_order() {
        let (train, test) = train_test_split(&series(10)).unwrap();
        assert_eq!(train.values(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(test.values(), &[8.0, 9.0]);
    }

    #[test]
    fn test_single_point_fails() {
        assert!(matches!(
            train_test_split(&series(1)),
            Err(DataError::Insufficient { .. })
        ));
    }
}
