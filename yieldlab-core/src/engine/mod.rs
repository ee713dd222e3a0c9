//! Simulation engine: split detection, per-run state, and the daily loop.

pub mod simulator;
pub mod split;
pub mod state;

pub use simulator::{run_backtest, step, DayObservations};
pub use split::{detect_split, SplitEvent, SplitSource, SPLIT_THRESHOLD};
pub use state::{DayPrices, DcaDripState, PriceBook, SimulationState, YieldRotationState};
