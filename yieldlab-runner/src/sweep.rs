//! Reinvest-ratio sweep: rerun Strategy 2 across growth/primary splits.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use yieldlab_core::{
    run_backtest, MarketData, ParamsError, PortfolioMetrics, ReinvestRatios, SimulationParams,
};

/// Smallest accepted grid step, in percentage points.
pub const MIN_RATIO_STEP: f64 = 0.1;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("ratio step must be in [0.1, 100], got {0}")]
    InvalidStep(f64),
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),
}

/// Growth-stock ratios `0, step, 2·step, …, 100`, each paired with `100 - g` for the primary ETF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioGrid {
    pub step: f64,
}

impl RatioGrid {
    pub fn new(step: f64) -> Result<Self, SweepError> {
        if !step.is_finite() || step < MIN_RATIO_STEP || step > 100.0 {
            return Err(SweepError::InvalidStep(step));
        }
        Ok(Self { step })
    }

    /// All ratio pairs in ascending growth order. 100 is always the last point.
    pub fn ratios(&self) -> Vec<ReinvestRatios> {
        let count = (100.0 / self.step + 1e-9).floor() as usize;
        let mut growth: Vec<f64> = (0..=count).map(|i| (i as f64 * self.step).min(100.0)).collect();
        if growth.last().is_some_and(|g| *g < 100.0) {
            growth.push(100.0);
        }
        growth
            .into_iter()
            .map(|g| ReinvestRatios::new(g, 100.0 - g))
            .collect()
    }

    pub fn size(&self) -> usize {
        self.ratios().len()
    }
}

impl Default for RatioGrid {
    fn default() -> Self {
        Self { step: 10.0 }
    }
}

/// Strategy 2 outcome for one ratio pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepEntry {
    pub ratios: ReinvestRatios,
    pub metrics2: PortfolioMetrics,
}

/// Run the engine once per ratio pair in parallel.
///
/// Results come back in ascending growth-ratio order regardless of scheduling.
pub fn sweep_ratios(
    params: &SimulationParams,
    data: &MarketData,
    grid: &RatioGrid,
) -> Result<Vec<SweepEntry>, SweepError> {
    let ratios = grid.ratios();
    for r in &ratios {
        let candidate = SimulationParams {
            reinvest_ratios: *r,
            ..params.clone()
        };
        candidate.validate()?;
    }

    tracing::info!(points = ratios.len(), step = grid.step, "starting ratio sweep");

    let entries: Vec<SweepEntry> = ratios
        .par_iter()
        .map(|r| {
            let run_params = SimulationParams {
                reinvest_ratios: *r,
                ..params.clone()
            };
            let result = run_backtest(&run_params, data);
            SweepEntry {
                ratios: *r,
                metrics2: result.metrics2,
            }
        })
        .collect();

    Ok(entries)
}

/// Entry with the highest Strategy 2 final value. Ties keep the lower growth ratio.
pub fn best_by_final_value(entries: &[SweepEntry]) -> Option<&SweepEntry> {
    entries.iter().reduce(|best, e| {
        if e.metrics2.final_value > best.metrics2.final_value {
            e
        } else {
            best
        }
    })
}
