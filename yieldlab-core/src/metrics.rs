//! Portfolio metrics: pure functions over a strategy's value series.
//!
//! Every metric is a pure function: value curve (and benchmark curve) in,
//! scalar out. No dependencies on the simulator.

use serde::{Deserialize, Serialize};

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Summary statistics for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub total_invested: f64,
    pub final_value: f64,
    pub total_return_percent: f64,
    pub annualized_volatility_percent: f64,
    /// Rounded to 2 decimals.
    pub beta: f64,
}

impl PortfolioMetrics {
    /// Metrics of a run that produced no values.
    pub fn empty(total_invested: f64) -> Self {
        Self {
            total_invested,
            final_value: 0.0,
            total_return_percent: 0.0,
            annualized_volatility_percent: 0.0,
            beta: 0.0,
        }
    }

    /// Compute metrics from a value curve, the cash put in, and the benchmark curve.
    ///
    /// `benchmark` is aligned index-for-index with `values`.
    pub fn compute(values: &[f64], total_invested: f64, benchmark: &[f64]) -> Self {
        let Some(&final_value) = values.last() else {
            return Self::empty(total_invested);
        };

        let returns = daily_returns(values);
        let benchmark_returns = daily_returns(benchmark);

        Self {
            total_invested,
            final_value,
            total_return_percent: total_return(final_value, total_invested) * 100.0,
            annualized_volatility_percent: annualized_volatility(&returns) * 100.0,
            beta: round_to(beta(&returns, &benchmark_returns), 2),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Simple daily returns: `value[i] / value[i-1] - 1` for i = 1..n-1.
///
/// A step starting from a non-positive value contributes 0.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return Vec::new();
    }
    values
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

/// Total return as a fraction of invested cash. 0 when nothing was invested.
pub fn total_return(final_value: f64, total_invested: f64) -> f64 {
    if total_invested <= 0.0 {
        return 0.0;
    }
    final_value / total_invested - 1.0
}

/// Sample standard deviation of daily returns, annualized by √252.
///
/// Returns 0.0 with fewer than 2 returns.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    std_dev(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Beta = cov(strategy, benchmark) / var(benchmark), paired over the same returns.
///
/// Returns 0.0 if the series differ in length, have fewer than 2 points, or the
/// benchmark has zero variance.
pub fn beta(returns: &[f64], benchmark_returns: &[f64]) -> f64 {
    if returns.len() != benchmark_returns.len() || returns.len() < 2 {
        return 0.0;
    }
    let mean_p = mean_f64(returns);
    let mean_m = mean_f64(benchmark_returns);

    let mut covariance = 0.0;
    let mut variance_m = 0.0;
    for (p, m) in returns.iter().zip(benchmark_returns) {
        covariance += (p - mean_p) * (m - mean_m);
        variance_m += (m - mean_m).powi(2);
    }

    if variance_m == 0.0 {
        return 0.0;
    }
    covariance / variance_m
}

/// Maximum drawdown as a negative percentage (e.g. -15.0 = 15% below peak).
///
/// Not part of [`PortfolioMetrics`]; reports compute it on demand.
pub fn max_drawdown_percent(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &v in values {
        peak = peak.max(v);
        if peak > 0.0 {
            max_dd = max_dd.min((v - peak) / peak);
        }
    }
    max_dd * 100.0
}

// ─── Helpers ────────────────────────────────────────────────────────

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
