//! Engine output: the daily trajectory plus per-strategy metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::PortfolioMetrics;

/// Both strategies' value on one output-eligible date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResult {
    pub date: NaiveDate,
    pub portfolio1_value: f64,
    pub portfolio2_value: f64,
    /// Cumulative cash contributed so far (same for both strategies).
    pub invested_amount_to_date: f64,
}

/// Complete result of one comparison run. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    pub daily_data: Vec<DailyResult>,
    pub metrics1: PortfolioMetrics,
    pub metrics2: PortfolioMetrics,
}

impl BacktestResult {
    pub fn is_empty(&self) -> bool {
        self.daily_data.is_empty()
    }

    /// First and last simulated dates, if any day was simulated.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.daily_data.first()?;
        let last = self.daily_data.last()?;
        Some((first.date, last.date))
    }

    pub fn portfolio1_values(&self) -> Vec<f64> {
        self.daily_data.iter().map(|d| d.portfolio1_value).collect()
    }

    pub fn portfolio2_values(&self) -> Vec<f64> {
        self.daily_data.iter().map(|d| d.portfolio2_value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(d: u32, v1: f64, v2: f64) -> DailyResult {
        DailyResult {
            date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
            portfolio1_value: v1,
            portfolio2_value: v2,
            invested_amount_to_date: 1_000.0,
        }
    }

    #[test]
    fn date_range_of_empty_result_is_none() {
        let result = BacktestResult {
            daily_data: vec![],
            metrics1: PortfolioMetrics::empty(0.0),
            metrics2: PortfolioMetrics::empty(0.0),
        };
        assert!(result.is_empty());
        assert_eq!(result.date_range(), None);
    }

    #[test]
    fn value_columns_follow_daily_order() {
        let result = BacktestResult {
            daily_data: vec![daily(1, 10.0, 20.0), daily(4, 11.0, 19.0)],
            metrics1: PortfolioMetrics::empty(0.0),
            metrics2: PortfolioMetrics::empty(0.0),
        };
        assert_eq!(result.portfolio1_values(), vec![10.0, 11.0]);
        assert_eq!(result.portfolio2_values(), vec![20.0, 19.0]);
        let (first, last) = result.date_range().unwrap();
        assert!(first < last);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&daily(1, 1.0, 2.0)).unwrap();
        assert!(json.contains("\"portfolio1Value\""));
        assert!(json.contains("\"investedAmountToDate\""));
        assert!(json.contains("\"2024-03-01\""));
    }
}
