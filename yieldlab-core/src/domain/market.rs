//! Market data: the three daily price/dividend series the engine consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The three fixed instruments of a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    /// Broad-market ETF. Strategy 1's only holding and the beta benchmark.
    PrimaryEtf,
    /// High-yield ETF. Strategy 2's contribution target.
    DividendEtf,
    /// Growth stock bought with part of Strategy 2's dividend cash.
    GrowthStock,
}

impl Instrument {
    pub const ALL: [Instrument; 3] = [
        Instrument::PrimaryEtf,
        Instrument::DividendEtf,
        Instrument::GrowthStock,
    ];

    /// Stable slot for fixed-size per-instrument tables.
    pub(crate) fn index(self) -> usize {
        match self {
            Instrument::PrimaryEtf => 0,
            Instrument::DividendEtf => 1,
            Instrument::GrowthStock => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Instrument::PrimaryEtf => "primary_etf",
            Instrument::DividendEtf => "dividend_etf",
            Instrument::GrowthStock => "growth_stock",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One instrument's observation on one calendar day.
///
/// `dividend` is cash paid per share on `date` (0 when nothing was paid).
/// `split_factor`, when present and greater than 1, is an explicit
/// corporate-action annotation that takes precedence over price-based split
/// detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataPoint {
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default)]
    pub dividend: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_factor: Option<f64>,
}

impl MarketDataPoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price,
            dividend: 0.0,
            split_factor: None,
        }
    }

    pub fn with_dividend(mut self, dividend: f64) -> Self {
        self.dividend = dividend;
        self
    }

    pub fn with_split_factor(mut self, factor: f64) -> Self {
        self.split_factor = Some(factor);
        self
    }

    /// A point only counts as an observation when its price is positive and finite.
    /// Zero or missing prices mean "no trade that day", never a zero valuation.
    pub fn is_priced(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Full input for one run: three independently dated series.
///
/// Each series should be sorted by date, but the aligner does not rely on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    #[serde(rename = "primaryETF")]
    pub primary_etf: Vec<MarketDataPoint>,
    #[serde(rename = "dividendETF")]
    pub dividend_etf: Vec<MarketDataPoint>,
    pub growth_stock: Vec<MarketDataPoint>,
}

impl MarketData {
    pub fn series(&self, instrument: Instrument) -> &[MarketDataPoint] {
        match instrument {
            Instrument::PrimaryEtf => &self.primary_etf,
            Instrument::DividendEtf => &self.dividend_etf,
            Instrument::GrowthStock => &self.growth_stock,
        }
    }

    pub fn series_mut(&mut self, instrument: Instrument) -> &mut Vec<MarketDataPoint> {
        match instrument {
            Instrument::PrimaryEtf => &mut self.primary_etf,
            Instrument::DividendEtf => &mut self.dividend_etf,
            Instrument::GrowthStock => &mut self.growth_stock,
        }
    }

    pub fn is_empty(&self) -> bool {
        Instrument::ALL.iter().all(|i| self.series(*i).is_empty())
    }
}
