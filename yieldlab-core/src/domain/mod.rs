//! Domain types for YieldLab

pub mod market;
pub mod params;
pub mod result;

pub use market::{Instrument, MarketData, MarketDataPoint};
pub use params::{ParamsError, ReinvestRatios, SimulationParams};
pub use result::{BacktestResult, DailyResult};
