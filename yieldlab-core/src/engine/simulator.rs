//! Day-by-day strategy simulation: the heart of the engine.
//!
//! Seven steps per output-eligible date:
//! 1. Split correction on a new primary-ETF observation
//! 2. Initial investment (first eligible date only)
//! 3. Monthly contribution (first eligible date of a new calendar month)
//! 4. Strategy 1 DRIP
//! 5. Strategy 2 dividend-ETF rotation
//! 6. Strategy 2 derived-holding dividends to cash
//! 7. Valuation

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::data::align::{align_series, AlignedSeries};
use crate::domain::{
    BacktestResult, DailyResult, Instrument, MarketData, MarketDataPoint, SimulationParams,
};
use crate::metrics::PortfolioMetrics;

use super::split::detect_split;
use super::state::SimulationState;

/// Genuine observations for one date. Gaps are `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayObservations<'a> {
    pub primary_etf: Option<&'a MarketDataPoint>,
    pub dividend_etf: Option<&'a MarketDataPoint>,
    pub growth_stock: Option<&'a MarketDataPoint>,
}

impl<'a> DayObservations<'a> {
    pub fn from_aligned(aligned: &AlignedSeries<'a>, date: NaiveDate) -> Self {
        Self {
            primary_etf: aligned.observation(Instrument::PrimaryEtf, date),
            dividend_etf: aligned.observation(Instrument::DividendEtf, date),
            growth_stock: aligned.observation(Instrument::GrowthStock, date),
        }
    }

    fn get(&self, instrument: Instrument) -> Option<&'a MarketDataPoint> {
        match instrument {
            Instrument::PrimaryEtf => self.primary_etf,
            Instrument::DividendEtf => self.dividend_etf,
            Instrument::GrowthStock => self.growth_stock,
        }
    }

    /// Dividend paid on `date`; carried-forward prices never carry dividends.
    fn dividend(&self, instrument: Instrument) -> f64 {
        self.get(instrument).map_or(0.0, |p| p.dividend)
    }
}

/// Run both strategies over `data` and compute their metrics.
///
/// Total: degenerate inputs (empty series, no overlap, empty window) produce an
/// empty `daily_data` and zeroed metrics. `params` are assumed validated.
pub fn run_backtest(params: &SimulationParams, data: &MarketData) -> BacktestResult {
    let aligned = align_series(data);
    let mut state = SimulationState::new();
    let mut daily_data = Vec::with_capacity(aligned.len());
    let mut skipped = 0usize;

    for &date in aligned
        .dates
        .iter()
        .filter(|date| params.window_contains(**date))
    {
        let day = DayObservations::from_aligned(&aligned, date);
        match step(&mut state, params, date, &day) {
            Some(result) => daily_data.push(result),
            None => skipped += 1,
        }
    }

    debug!(
        days = daily_data.len(),
        skipped,
        splits = state.splits_applied,
        "simulation complete"
    );

    let values1: Vec<f64> = daily_data.iter().map(|d| d.portfolio1_value).collect();
    let values2: Vec<f64> = daily_data.iter().map(|d| d.portfolio2_value).collect();

    // Strategy 1 is the market proxy for both strategies, itself included.
    let metrics1 = PortfolioMetrics::compute(&values1, state.strategy1.cash_invested, &values1);
    let metrics2 = PortfolioMetrics::compute(&values2, state.strategy2.cash_invested, &values1);

    BacktestResult {
        daily_data,
        metrics1,
        metrics2,
    }
}

/// Advance the state by one aligned date.
///
/// Returns `None` while some instrument has never been observed.
pub fn step(
    state: &mut SimulationState,
    params: &SimulationParams,
    date: NaiveDate,
    day: &DayObservations<'_>,
) -> Option<DailyResult> {
    // ─── 1. Split correction ───
    // Compared against the previous observation before the baseline moves.
    if let Some(obs) = day.primary_etf {
        if let Some(split) = detect_split(state.prices.last(Instrument::PrimaryEtf), obs) {
            debug!(%date, factor = split.factor, source = ?split.source, "primary ETF split");
            state.apply_primary_split(split.factor);
        }
    }

    for instrument in Instrument::ALL {
        if let Some(obs) = day.get(instrument) {
            state.prices.observe(instrument, obs.price);
        }
    }

    let prices = state.prices.resolve()?;

    // ─── 2–3. Initial investment / monthly contribution ───
    let month = (date.year(), date.month());
    let amount = match state.contribution_month {
        None => Some(params.initial_principal),
        Some(last) if last != month => Some(params.monthly_contribution),
        Some(_) => None,
    };
    if let Some(amount) = amount {
        state.strategy1.contribute(amount, prices.primary_etf);
        state.strategy2.contribute(amount, prices.dividend_etf);
        state.contribution_month = Some(month);
    }

    // ─── 4. Strategy 1 DRIP ───
    let primary_dividend = day.dividend(Instrument::PrimaryEtf);
    state
        .strategy1
        .reinvest_dividend(primary_dividend, prices.primary_etf);

    // ─── 5. Strategy 2 dividend-ETF rotation ───
    state.strategy2.rotate_dividend(
        day.dividend(Instrument::DividendEtf),
        &params.reinvest_ratios,
        &prices,
    );

    // ─── 6. Strategy 2 derived holdings ───
    state
        .strategy2
        .collect_derived_dividends(day.dividend(Instrument::GrowthStock), primary_dividend);

    // ─── 7. Valuation ───
    Some(DailyResult {
        date,
        portfolio1_value: state.strategy1.value(prices.primary_etf),
        portfolio2_value: state.strategy2.value(&prices),
        invested_amount_to_date: state.strategy1.cash_invested,
    })
}
