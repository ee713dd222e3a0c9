//! Run orchestration: config → data → engine → report.
//!
//! Two entry points:
//! - `run_from_config()`: validates, loads data (CSV or synthetic), then runs. Used by CLI.
//! - `run_with_data()`: takes pre-loaded data. Used by tests and the ratio sweep.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use yieldlab_core::{run_backtest, BacktestResult, MarketData, ParamsError, SimulationParams};

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::data_loader::{load_market_data, LoadError, LoadOptions};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// A finished comparison run plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub dataset_hash: String,
    pub has_synthetic: bool,
    pub params: SimulationParams,
    pub result: BacktestResult,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl RunReport {
    pub fn day_count(&self) -> usize {
        self.result.daily_data.len()
    }
}

/// Run one comparison from a config, loading its data.
pub fn run_from_config(config: &BacktestConfig, opts: &LoadOptions) -> Result<RunReport, RunError> {
    config.validate()?;
    let params = config.to_params();

    tracing::info!(
        start = %params.start_date,
        end = %params.end_date,
        synthetic = opts.synthetic,
        "loading market data"
    );
    let loaded = load_market_data(config.data.as_ref(), opts)?;

    run_with_data(
        &params,
        &loaded.data,
        config.run_id(),
        &loaded.dataset_hash,
        loaded.has_synthetic,
    )
}

/// Run one comparison over pre-loaded data. No I/O.
pub fn run_with_data(
    params: &SimulationParams,
    data: &MarketData,
    run_id: RunId,
    dataset_hash: &str,
    has_synthetic: bool,
) -> Result<RunReport, RunError> {
    params.validate()?;

    let result = run_backtest(params, data);
    if result.is_empty() {
        tracing::warn!("no simulated days: the window holds no date where all three instruments are priced");
    } else {
        tracing::info!(
            days = result.daily_data.len(),
            strategy1_final = result.metrics1.final_value,
            strategy2_final = result.metrics2.final_value,
            "backtest complete"
        );
    }

    Ok(RunReport {
        schema_version: SCHEMA_VERSION,
        run_id,
        dataset_hash: dataset_hash.to_string(),
        has_synthetic,
        params: params.clone(),
        result,
    })
}
