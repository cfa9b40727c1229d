//! Bar loading from CSV files.
//!
//! Expects a header row. Columns are matched by name, case-insensitively:
//! - `open`, `high`, `low`, `close` are required
//! - the first of `date`, `datetime`, `timestamp`, `time`, `gmt time`,
//!   `local time` becomes the bar label (optional)
//! - every other column is ignored
//!
//! Bars are returned oldest first. The simulator never re-sorts, so this is the
//! only place row order is decided. Bars violating the OHLC envelope are counted
//! and logged but kept.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, warn};

use continuity_core::Bar;

use crate::config::BarOrder;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub order: BarOrder,
}

/// Oldest-first bars plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub bars: Vec<Bar>,
    /// Raw label per bar (same index as `bars`), when the file has a date column.
    pub labels: Vec<Option<String>>,
    /// BLAKE3 over the oldest-first OHLC values.
    pub dataset_hash: String,
    /// Bars violating the OHLC envelope. They are still part of `bars`.
    pub insane_bars: usize,
}

impl LoadedData {
    /// Build from bars already in oldest-first order, without labels.
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        let labels = vec![None; bars.len()];
        let insane_bars = bars.iter().filter(|b| !b.is_sane()).count();
        let dataset_hash = compute_dataset_hash(&bars);
        Self {
            bars,
            labels,
            dataset_hash,
            insane_bars,
        }
    }

    pub fn first_label(&self) -> Option<&str> {
        self.labels.first().and_then(|l| l.as_deref())
    }

    pub fn last_label(&self) -> Option<&str> {
        self.labels.last().and_then(|l| l.as_deref())
    }
}

const LABEL_COLUMNS: &[&str] = &[
    "date",
    "datetime",
    "timestamp",
    "time",
    "gmt time",
    "local time",
];

/// Load bars from a CSV file on disk.
pub fn load_csv(path: &Path, opts: &LoadOptions) -> Result<LoadedData, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let loaded = load_csv_from_reader(file, opts)?;
    debug!(
        path = %path.display(),
        bars = loaded.bars.len(),
        hash = %loaded.dataset_hash,
        "loaded bars"
    );
    Ok(loaded)
}

/// Load bars from any CSV source.
pub fn load_csv_from_reader<R: Read>(reader: R, opts: &LoadOptions) -> Result<LoadedData, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_ascii_lowercase())
        .collect();
    let find = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let open_idx = find("open")?;
    let high_idx = find("high")?;
    let low_idx = find("low")?;
    let close_idx = find("close")?;
    let label_idx = LABEL_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name));

    let mut bars = Vec::new();
    let mut labels = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let row = i + 2;
        let field = |idx: usize, column: &'static str| -> Result<f64, LoadError> {
            let raw = record.get(idx).unwrap_or("");
            raw.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
                row,
                column,
                value: raw.to_string(),
            })
        };
        bars.push(Bar::new(
            field(open_idx, "open")?,
            field(high_idx, "high")?,
            field(low_idx, "low")?,
            field(close_idx, "close")?,
        ));
        labels.push(
            label_idx
                .and_then(|idx| record.get(idx))
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }

    if should_reverse(opts.order, &labels) {
        bars.reverse();
        labels.reverse();
    }

    let insane_bars = bars.iter().filter(|b| !b.is_sane()).count();
    if insane_bars > 0 {
        warn!(
            insane_bars,
            total = bars.len(),
            "bars violate the OHLC envelope; simulating them unchanged"
        );
    }

    let dataset_hash = compute_dataset_hash(&bars);
    Ok(LoadedData {
        bars,
        labels,
        dataset_hash,
        insane_bars,
    })
}

fn should_reverse(order: BarOrder, labels: &[Option<String>]) -> bool {
    match order {
        BarOrder::NewestFirst => true,
        BarOrder::OldestFirst => false,
        BarOrder::Auto => {
            let first = labels.iter().flatten().find_map(|l| parse_timestamp(l));
            let last = labels.iter().rev().flatten().find_map(|l| parse_timestamp(l));
            match (first, last) {
                (Some(first), Some(last)) => first > last,
                _ => {
                    warn!("order = auto but no parseable timestamps; keeping file order");
                    false
                }
            }
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y.%m.%d", "%b %d, %Y"];

/// Parse the common date/time shapes found in FX exports.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Compute a deterministic BLAKE3 hash over all bar data, in series order.
fn compute_dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEWEST_FIRST: &str = "\
Date,Open,High,Low,Close,Change(Pips),Change(%)
2024-01-03,1.0930,1.0950,1.0920,1.0940,10.0,0.09
2024-01-02,1.0910,1.0935,1.0905,1.0930,20.0,0.18
2024-01-01,1.0900,1.0915,1.0890,1.0910,10.0,0.09
";

    fn load(csv: &str, order: BarOrder) -> Result<LoadedData, LoadError> {
        load_csv_from_reader(csv.as_bytes(), &LoadOptions { order })
    }

    #[test]
    fn newest_first_is_reversed() {
        let data = load(NEWEST_FIRST, BarOrder::NewestFirst).unwrap();
        assert_eq!(data.bars.len(), 3);
        assert_eq!(data.bars[0].open, 1.0900);
        assert_eq!(data.bars[2].close, 1.0940);
        assert_eq!(data.first_label(), Some("2024-01-01"));
        assert_eq!(data.last_label(), Some("2024-01-03"));
    }

    #[test]
    fn oldest_first_keeps_file_order() {
        let data = load(NEWEST_FIRST, BarOrder::OldestFirst).unwrap();
        assert_eq!(data.bars[0].open, 1.0930);
        assert_eq!(data.first_label(), Some("2024-01-03"));
    }

    #[test]
    fn auto_order_follows_timestamps() {
        let data = load(NEWEST_FIRST, BarOrder::Auto).unwrap();
        assert_eq!(data.first_label(), Some("2024-01-01"));

        let ascending = "date,open,high,low,close\n01.01.2024,1,2,0.5,1.5\n02.01.2024,1.5,2,1,1.8\n";
        let data = load(ascending, BarOrder::Auto).unwrap();
        assert_eq!(data.first_label(), Some("01.01.2024"));
    }

    #[test]
    fn auto_without_labels_keeps_order() {
        let csv = "open,high,low,close\n1,2,0.5,1.5\n1.5,2,1,1.8\n";
        let data = load(csv, BarOrder::Auto).unwrap();
        assert_eq!(data.bars[0].open, 1.0);
        assert_eq!(data.first_label(), None);
    }

    #[test]
    fn headers_are_case_insensitive_and_trimmed() {
        let csv = " OPEN , High,LOW,close \n1,2,0.5,1.5\n";
        let data = load(csv, BarOrder::OldestFirst).unwrap();
        assert_eq!(data.bars[0], Bar::new(1.0, 2.0, 0.5, 1.5));
    }

    #[test]
    fn missing_column_reported() {
        let err = load("open,high,close\n1,2,1.5\n", BarOrder::OldestFirst).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("low")));
    }

    #[test]
    fn bad_number_reports_row_and_column() {
        let csv = "open,high,low,close\n1,2,0.5,1.5\n1,abc,0.5,1.5\n";
        match load(csv, BarOrder::OldestFirst).unwrap_err() {
            LoadError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "high");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn insane_bars_are_counted_not_dropped() {
        let csv = "open,high,low,close\n1,0.5,2,1.5\n1,2,0.5,1.5\n";
        let data = load(csv, BarOrder::OldestFirst).unwrap();
        assert_eq!(data.bars.len(), 2);
        assert_eq!(data.insane_bars, 1);
    }

    #[test]
    fn empty_file_yields_no_bars() {
        let data = load("open,high,low,close\n", BarOrder::NewestFirst).unwrap();
        assert!(data.bars.is_empty());
    }

    #[test]
    fn dataset_hash_depends_on_order() {
        let newest = load(NEWEST_FIRST, BarOrder::NewestFirst).unwrap();
        let oldest = load(NEWEST_FIRST, BarOrder::OldestFirst).unwrap();
        assert_ne!(newest.dataset_hash, oldest.dataset_hash);
        assert_eq!(newest.dataset_hash, LoadedData::from_bars(newest.bars.clone()).dataset_hash);
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        assert!(parse_timestamp("2024-01-02").is_some());
        assert!(parse_timestamp("2024-01-02 13:45:00").is_some());
        assert!(parse_timestamp("02.01.2024 13:45:00.000").is_some());
        assert!(parse_timestamp("01/02/2024").is_some());
        assert!(parse_timestamp("Jan 02, 2024").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
