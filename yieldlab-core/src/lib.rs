//! YieldLab Core: the strategy comparison engine.
//!
//! Compares a dollar-cost-averaged broad-market ETF with dividend reinvestment
//! against a high-yield ETF whose dividends rotate into a growth stock and the
//! broad-market ETF. This crate contains:
//! - Domain types (market series, simulation parameters, results)
//! - Series alignment onto a common date axis
//! - Stock-split detection for the primary ETF
//! - The day-by-day two-strategy simulator
//! - Return, volatility, and beta metrics
//!
//! The engine is a pure function: [`run_backtest`] takes parameters and market
//! data and returns a [`BacktestResult`]. No I/O, no shared state.

pub mod data;
pub mod domain;
pub mod engine;
pub mod metrics;

pub use domain::{
    BacktestResult, DailyResult, Instrument, MarketData, MarketDataPoint, ParamsError,
    ReinvestRatios, SimulationParams,
};
pub use engine::run_backtest;
pub use metrics::PortfolioMetrics;
