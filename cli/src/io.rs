//! Tick CSV reading, standardisation and writing.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use corelib::stats;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum TickDataError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tick file has no data rows")]
    Empty,

    #[error("missing required columns: {time_col}, {price_col}")]
    MissingColumns { time_col: String, price_col: String },

    #[error("all timestamps failed to parse; use ISO 8601 or epoch seconds")]
    UnparseableTimestamps,

    #[error("row {row}: price {value:?} is not a number")]
    InvalidPrice { row: usize, value: String },

    #[error("row {row}: negative price {value}")]
    NegativePrice { row: usize, value: f64 },
}

/// One observation. `raw_time` is written back verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub raw_time: String,
    pub time: NaiveDateTime,
    pub price: f64,
}

/// Which CSV columns hold the timestamp and the price.
#[derive(Debug, Clone)]
pub struct Columns {
    pub time: String,
    pub price: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            time: "timestamp".into(),
            price: "price".into(),
        }
    }
}

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// ISO 8601 / RFC 3339 timestamps, plain dates, or epoch seconds.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }
    let secs = s.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999)).map(|dt| dt.naive_utc())
}

/// Reads, validates and time-sorts ticks.
///
/// Rows whose timestamp does not parse, or whose price is blank or NaN, are
/// dropped. An empty file, missing columns, a non-numeric or negative price,
/// or a file where no timestamp parses are errors.
#[instrument(target = "cli", skip(columns), fields(path = %path.as_ref().display()))]
pub fn read_ticks(path: impl AsRef<Path>, columns: &Columns) -> Result<Vec<Tick>, TickDataError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let headers = reader.headers()?.clone();

    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let (Some(ti), Some(pi)) = (find(&columns.time), find(&columns.price)) else {
        return Err(TickDataError::MissingColumns {
            time_col: columns.time.clone(),
            price_col: columns.price.clone(),
        });
    };

    let mut rows = 0usize;
    let mut bad_time = 0usize;
    let mut ticks = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        rows += 1;
        let row = i + 1;

        let raw_time = record.get(ti).unwrap_or("").trim().to_string();
        let raw_price = record.get(pi).unwrap_or("").trim();

        let Some(time) = parse_timestamp(&raw_time) else {
            bad_time += 1;
            continue;
        };
        if raw_price.is_empty() {
            continue;
        }
        let price: f64 = raw_price.parse().map_err(|_| TickDataError::InvalidPrice {
            row,
            value: raw_price.to_string(),
        })?;
        if price.is_nan() {
            continue;
        }
        if price.is_infinite() {
            return Err(TickDataError::InvalidPrice {
                row,
                value: raw_price.to_string(),
            });
        }
        if price < 0.0 {
            return Err(TickDataError::NegativePrice { row, value: price });
        }

        ticks.push(Tick {
            raw_time,
            time,
            price,
        });
    }

    if rows == 0 {
        return Err(TickDataError::Empty);
    }
    if bad_time == rows {
        return Err(TickDataError::UnparseableTimestamps);
    }
    if bad_time > 0 {
        warn!(dropped = bad_time, "dropped rows with unparseable timestamps");
    }

    ticks.sort_by_key(|t| t.time);
    debug!(rows, kept = ticks.len(), "ticks loaded");
    Ok(ticks)
}

/// Affine map applied once before denoising and inverted once after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standardizer {
    pub mean: f64,
    pub std: f64,
}

impl Standardizer {
    pub const IDENTITY: Standardizer = Standardizer {
        mean: 0.0,
        std: 1.0,
    };

    /// Mean and population standard deviation (plus 1e-12) of `x`.
    pub fn fit(x: &[f64]) -> Self {
        Self {
            mean: stats::mean(x),
            std: stats::std_dev(x) + 1e-12,
        }
    }

    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|v| (v - self.mean) / self.std).collect()
    }

    pub fn invert(&self, z: &[f64]) -> Vec<f64> {
        z.iter().map(|v| v * self.std + self.mean).collect()
    }
}

/// Writes `time,price` rows, creating parent directories as needed.
pub fn write_ticks(
    path: impl AsRef<Path>,
    columns: &Columns,
    times: &[String],
    prices: &[f64],
) -> Result<(), TickDataError> {
    assert_eq!(times.len(), prices.len(), "timestamps and prices differ in length");

    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([columns.time.as_str(), columns.price.as_str()])?;
    for (t, p) in times.iter().zip(prices) {
        writer.write_record([t.as_str(), p.to_string().as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Prices of `original` and `denoised` at the timestamps both contain, in
/// `original` order.
pub fn join_on_time(original: &[Tick], denoised: &[Tick]) -> (Vec<f64>, Vec<f64>) {
    let by_time: HashMap<&str, f64> = denoised
        .iter()
        .map(|t| (t.raw_time.as_str(), t.price))
        .collect();

    original
        .iter()
        .filter_map(|t| by_time.get(t.raw_time.as_str()).map(|&d| (t.price, d)))
        .unzip()
}
