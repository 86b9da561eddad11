//! Sampling-cadence and seasonality inference.
//!
//! The cadence is classified from the median gap between consecutive
//! timestamps, with a tolerance window around each known spacing so mildly
//! irregular data still resolves. Anything unrecognizable falls back to
//! daily, which keeps inference total: it never fails once there are at
//! least two timestamps.

use chrono::{DateTime, Utc};

use crate::models::{DataError, FrequencyCode, SeasonalConfig};

const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_WEEK: i64 = 7 * SECS_PER_DAY;

/// Relative tolerance applied around each candidate spacing.
const GAP_TOLERANCE: f64 = 0.1;

/// Infer the sampling cadence and seasonal period for a timestamp sequence.
///
/// Requires at least two timestamps. Deterministic: the same sequence always
/// yields the same configuration.
pub fn infer_frequency(timestamps: &[DateTime<Utc>]) -> Result<SeasonalConfig, DataError> {
    if timestamps.len() < 2 {
        return Err(DataError::Insufficient {
            required: 2,
            actual: timestamps.len(),
        });
    }

    let mut gaps: Vec<i64> = timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds())
        .collect();
    gaps.sort_unstable();
    let median = gaps[gaps.len() / 2];

    Ok(SeasonalConfig::from_frequency(classify_gap(median)))
}

fn classify_gap(gap_secs: i64) -> FrequencyCode {
    if within(gap_secs, SECS_PER_HOUR) {
        FrequencyCode::Hourly
    } else if within(gap_secs, SECS_PER_DAY) {
        FrequencyCode::Daily
    } else if within(gap_secs, SECS_PER_WEEK) {
        FrequencyCode::Weekly
    } else if (28 * SECS_PER_DAY..=31 * SECS_PER_DAY).contains(&gap_secs) {
        FrequencyCode::Monthly
    } else {
        // Unrecognized spacing defaults to daily
        FrequencyCode::Other
    }
}

fn within(gap_secs: i64, target: i64) -> bool {
    (gap_secs - target).abs() as f64 <= target as f64 * GAP_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Months, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn spaced(n: usize, step: Duration) -> Vec<DateTime<Utc>> {
        (0..n).map(|i| start() + step * i as i32).collect()
    }

    #[test]
    fn test_daily_spacing() {
        let config = infer_frequency(&spaced(30, Duration::days(1))).unwrap();
        assert_eq!(config.frequency, FrequencyCode::Daily);
        assert_eq!(config.seasonal_period, 7);
        assert!(config.seasonal_enabled);
    }

    #[test]
    fn test_hourly_spacing() {
        let config = infer_frequency(&spaced(48, Duration::hours(1))).unwrap();
        assert_eq!(config.frequency, FrequencyCode::Hourly);
        assert_eq!(config.seasonal_period, 24);
    }

    #[test]
    fn test_weekly_spacing() {
        let config = infer_frequency(&spaced(20, Duration::weeks(1))).unwrap();
        assert_eq!(config.frequency, FrequencyCode::Weekly);
        assert_eq!(config.seasonal_period, 52);
    }

    #[test]
    fn test_monthly_spacing() {
        // Calendar months have uneven lengths; all gaps fall in 28..=31 days
        let timestamps: Vec<DateTime<Utc>> = (0..24)
            .map(|i| {
                start()
                    .checked_add_months(Months::new(i))
                    .expect("valid month offset")
            })
            .collect();
        let config = infer_frequency(&timestamps).unwrap();
        assert_eq!(config.frequency, FrequencyCode::Monthly);
        assert_eq!(config.seasonal_period, 12);
    }

    #[test]
    fn test_irregular_spacing_falls_back_to_daily_period() {
        let timestamps = vec![
            start(),
            start() + Duration::days(3),
            start() + Duration::days(4),
            start() + Duration::days(11),
            start() + Duration::days(15),
        ];
        let config = infer_frequency(&timestamps).unwrap();
        assert_eq!(config.frequency, FrequencyCode::Other);
        assert_eq!(config.seasonal_period, 7);
        assert!(config.seasonal_enabled);
    }

    #[test]
    fn test_determinism() {
        let timestamps = spaced(50, Duration::days(1));
        let a = infer_frequency(&timestamps).unwrap();
        let b = infer_frequency(&timestamps).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_few_timestamps() {
        let err = infer_frequency(&[start()]).unwrap_err();
        assert!(matches!(
            err,
            DataError::Insufficient {
                required: 2,
                actual: 1
            }
        ));
    }
}
