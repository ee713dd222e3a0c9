//! YieldLab Runner: orchestration around the comparison engine.
//!
//! This crate builds on `yieldlab-core` to provide:
//! - TOML run configuration with content-addressed run IDs
//! - CSV market data loading with a deterministic synthetic fallback
//! - Single-run orchestration producing a versioned `RunReport`
//! - JSON/CSV artifact export
//! - Parallel reinvest-ratio sweeps

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod sweep;
pub mod synthetic;

pub use config::{BacktestConfig, ConfigError, DataPaths, RunId};
pub use data_loader::{load_market_data, load_series, LoadError, LoadOptions, LoadedData};
pub use export::{export_daily_csv, export_json, export_metrics_csv, import_json, save_artifacts};
pub use runner::{run_from_config, run_with_data, RunError, RunReport, SCHEMA_VERSION};
pub use sweep::{best_by_final_value, sweep_ratios, RatioGrid, SweepEntry, SweepError};
pub use synthetic::generate_market_data;
