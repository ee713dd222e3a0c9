//! Market data loading for the runner.
//!
//! Resolves the three instrument series from one of two sources:
//! 1. `--synthetic` → deterministic generated series (tagged)
//! 2. `[data]` paths in the config → one CSV file per instrument
//!
//! CSV layout is `date,price[,dividend][,split_factor]` with a header row.
//! Rows without a positive price are dropped. Duplicate dates keep the last row.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use yieldlab_core::{Instrument, MarketData, MarketDataPoint};

use crate::config::DataPaths;
use crate::synthetic::generate_market_data;

/// Accepted date formats, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} line {line}: unrecognized date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("{path} has no rows with a positive price")]
    NoPricedRows { path: PathBuf },

    #[error("no market data source: add a [data] section to the config or use --synthetic")]
    NoDataSource,
}

/// Options controlling how market data is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// First date kept (inclusive).
    pub start: NaiveDate,
    /// Last date kept (inclusive).
    pub end: NaiveDate,
    /// Generate synthetic series instead of reading files.
    pub synthetic: bool,
    /// RNG seed for the synthetic source.
    pub seed: u64,
}

/// Result of loading, including provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub data: MarketData,
    /// BLAKE3 fingerprint over every loaded point.
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    price: Option<f64>,
    #[serde(default)]
    dividend: Option<f64>,
    #[serde(default)]
    split_factor: Option<f64>,
}

/// Load all three series for a run.
///
/// This is the primary entry point for the runner to get market data.
pub fn load_market_data(
    paths: Option<&DataPaths>,
    opts: &LoadOptions,
) -> Result<LoadedData, LoadError> {
    if opts.synthetic {
        tracing::warn!(
            seed = opts.seed,
            "generating synthetic market data; results will be tagged as synthetic"
        );
        let data = generate_market_data(opts.start, opts.end, opts.seed);
        let dataset_hash = compute_dataset_hash(&data);
        return Ok(LoadedData {
            data,
            dataset_hash,
            has_synthetic: true,
        });
    }

    let paths = paths.ok_or(LoadError::NoDataSource)?;
    let mut data = MarketData::default();
    for instrument in Instrument::ALL {
        let path = paths.path(instrument);
        let mut series = load_series(path)?;
        let total = series.len();
        series.retain(|p| p.date >= opts.start && p.date <= opts.end);
        tracing::info!(
            instrument = instrument.label(),
            path = %path.display(),
            rows = total,
            in_window = series.len(),
            "loaded series"
        );
        *data.series_mut(instrument) = series;
    }

    let dataset_hash = compute_dataset_hash(&data);
    Ok(LoadedData {
        data,
        dataset_hash,
        has_synthetic: false,
    })
}

/// Read one instrument series from a CSV file.
pub fn load_series(path: &Path) -> Result<Vec<MarketDataPoint>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_series(file, path)
}

/// Parse a series from any reader. `path` is only used in error messages.
pub fn parse_series<R: Read>(reader: R, path: &Path) -> Result<Vec<MarketDataPoint>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut by_date: BTreeMap<NaiveDate, MarketDataPoint> = BTreeMap::new();
    let mut dropped = 0usize;

    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        // Header is line 1.
        let line = i as u64 + 2;
        let date = parse_date(&row.date).ok_or_else(|| LoadError::InvalidDate {
            path: path.to_path_buf(),
            line,
            value: row.date.clone(),
        })?;

        let price = row.price.unwrap_or(0.0);
        let mut point = MarketDataPoint::new(date, price);
        if !point.is_priced() {
            dropped += 1;
            continue;
        }
        if let Some(dividend) = row.dividend.filter(|d| d.is_finite() && *d > 0.0) {
            point = point.with_dividend(dividend);
        }
        if let Some(factor) = row.split_factor.filter(|f| f.is_finite() && *f > 1.0) {
            point = point.with_split_factor(factor);
        }
        by_date.insert(date, point);
    }

    if by_date.is_empty() {
        return Err(LoadError::NoPricedRows {
            path: path.to_path_buf(),
        });
    }
    if dropped > 0 {
        tracing::debug!(path = %path.display(), dropped, "skipped rows without a positive price");
    }

    Ok(by_date.into_values().collect())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Compute a deterministic BLAKE3 hash over all market data.
///
/// Covers every point of every instrument in a fixed instrument order.
pub fn compute_dataset_hash(data: &MarketData) -> String {
    let mut hasher = blake3::Hasher::new();

    for instrument in Instrument::ALL {
        hasher.update(instrument.label().as_bytes());
        for point in data.series(instrument) {
            hasher.update(point.date.to_string().as_bytes());
            hasher.update(&point.price.to_le_bytes());
            hasher.update(&point.dividend.to_le_bytes());
            hasher.update(&point.split_factor.unwrap_or(1.0).to_le_bytes());
        }
    }

    hasher.finalize().to_hex().to_string()
}
