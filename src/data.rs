//! CSV dataset loading and cleaning.
//!
//! Expects a `ds` column (timestamps) and a `y` column (numeric values).
//! Rows with missing or unparseable entries in either column are dropped,
//! rows are sorted ascending by timestamp, and duplicate timestamps keep the
//! first occurrence. The cleaned observations are validated into a
//! [`TimeSeries`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::{DataError, TimeSeries};

/// Timestamp column name
const COL_DS: &str = "ds";
/// Value column name
const COL_Y: &str = "y";

/// Load a time series from a local CSV file or an HTTP(S) URL.
pub async fn load_series(source: &str) -> Result<TimeSeries, DataError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let body = fetch_text(source).await?;
        parse_csv(body.as_bytes())
    } else {
        load_csv(Path::new(source))
    }
}

/// Load a time series from a local CSV file.
pub fn load_csv(path: &Path) -> Result<TimeSeries, DataError> {
    let file = File::open(path)
        .map_err(|e| DataError::Csv(format!("cannot open '{}': {}", path.display(), e)))?;
    parse_csv(file)
}

/// Parse CSV content from any reader into a cleaned, sorted time series.
pub fn parse_csv<R: Read>(reader: R) -> Result<TimeSeries, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| DataError::Csv(e.to_string()))?;
    let ds_idx = column_index(headers, COL_DS)?;
    let y_idx = column_index(headers, COL_Y)?;

    let mut points: Vec<(DateTime<Utc>, f64)> = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| DataError::Csv(e.to_string()))?;

        // dropna: skip rows where either column is absent or unparseable
        let ts = record.get(ds_idx).and_then(parse_timestamp);
        let value = record
            .get(y_idx)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite());
        if let (Some(ts), Some(value)) = (ts, value) {
            points.push((ts, value));
        }
    }

    if points.is_empty() {
        return Err(DataError::Empty);
    }

    points.sort_by_key(|(ts, _)| *ts);
    points.dedup_by_key(|(ts, _)| *ts);

    TimeSeries::new(points)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

/// Parse a timestamp cell, accepting RFC 3339, `YYYY-MM-DD HH:MM:SS` and
/// plain `YYYY-MM-DD` dates.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

async fn fetch_text(url: &str) -> Result<String, DataError> {
    let response = reqwest::get(url).await.map_err(|e| DataError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let response = response.error_for_status().map_err(|e| DataError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    response.text().await.map_err(|e| DataError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })
}
