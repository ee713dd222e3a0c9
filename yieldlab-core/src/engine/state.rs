//! Mutable simulation state: per-strategy accumulators and last known prices.
//!
//! Everything here is created fresh for one run, owned by the simulator for
//! the run's duration, and dropped afterwards.

use crate::domain::{Instrument, ReinvestRatios};

/// Strategy 1: dollar-cost average into the primary ETF, reinvest its dividends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DcaDripState {
    pub shares: f64,
    pub cash_invested: f64,
}

impl DcaDripState {
    /// Invest new money (principal or monthly contribution).
    pub fn contribute(&mut self, amount: f64, price: f64) {
        self.shares += amount / price;
        self.cash_invested += amount;
    }

    /// Reinvest a per-share dividend into the same instrument at `price`.
    /// Returns the dividend cash reinvested.
    pub fn reinvest_dividend(&mut self, dividend_per_share: f64, price: f64) -> f64 {
        if dividend_per_share <= 0.0 || self.shares <= 0.0 {
            return 0.0;
        }
        let cash = self.shares * dividend_per_share;
        self.shares += cash / price;
        cash
    }

    pub fn apply_split(&mut self, factor: f64) {
        self.shares *= factor;
    }

    pub fn value(&self, primary_price: f64) -> f64 {
        self.shares * primary_price
    }
}

/// Strategy 2: dollar-cost average into the dividend ETF, rotate its dividends
/// into the growth stock and primary ETF, hold dividends of those as cash.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YieldRotationState {
    pub shares_dividend: f64,
    pub shares_growth: f64,
    pub shares_primary: f64,
    /// Dividends from derived holdings; counted in value, never reinvested.
    pub cash_balance: f64,
    pub cash_invested: f64,
}

impl YieldRotationState {
    pub fn contribute(&mut self, amount: f64, dividend_etf_price: f64) {
        self.shares_dividend += amount / dividend_etf_price;
        self.cash_invested += amount;
    }

    /// Split dividend-ETF cash by `ratios` and buy the growth stock and primary ETF.
    /// Returns the dividend cash distributed.
    pub fn rotate_dividend(
        &mut self,
        dividend_per_share: f64,
        ratios: &ReinvestRatios,
        prices: &DayPrices,
    ) -> f64 {
        if dividend_per_share <= 0.0 || self.shares_dividend <= 0.0 {
            return 0.0;
        }
        let cash = self.shares_dividend * dividend_per_share;
        self.shares_growth += cash * ratios.growth_fraction() / prices.growth_stock;
        self.shares_primary += cash * ratios.primary_fraction() / prices.primary_etf;
        cash
    }

    /// Bank dividends paid on the derived holdings.
    pub fn collect_derived_dividends(&mut self, growth_dividend: f64, primary_dividend: f64) {
        if growth_dividend > 0.0 && self.shares_growth > 0.0 {
            self.cash_balance += self.shares_growth * growth_dividend;
        }
        if primary_dividend > 0.0 && self.shares_primary > 0.0 {
            self.cash_balance += self.shares_primary * primary_dividend;
        }
    }

    pub fn apply_split(&mut self, factor: f64) {
        self.shares_primary *= factor;
    }

    pub fn value(&self, prices: &DayPrices) -> f64 {
        self.shares_dividend * prices.dividend_etf
            + self.shares_growth * prices.growth_stock
            + self.shares_primary * prices.primary_etf
            + self.cash_balance
    }
}

/// Effective prices of all three instruments on one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPrices {
    pub primary_etf: f64,
    pub dividend_etf: f64,
    pub growth_stock: f64,
}

/// Last observed price per instrument. `None` until the first observation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBook {
    last: [Option<f64>; 3],
}

impl PriceBook {
    pub fn last(&self, instrument: Instrument) -> Option<f64> {
        self.last[instrument.index()]
    }

    pub fn observe(&mut self, instrument: Instrument, price: f64) {
        self.last[instrument.index()] = Some(price);
    }

    /// Effective prices once every instrument has been observed at least once.
    pub fn resolve(&self) -> Option<DayPrices> {
        Some(DayPrices {
            primary_etf: self.last(Instrument::PrimaryEtf)?,
            dividend_etf: self.last(Instrument::DividendEtf)?,
            growth_stock: self.last(Instrument::GrowthStock)?,
        })
    }
}

/// Calendar month key, `(year, month)`.
pub type MonthKey = (i32, u32);

/// All mutable state of one simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    pub strategy1: DcaDripState,
    pub strategy2: YieldRotationState,
    pub prices: PriceBook,
    /// Month of the last initial/periodic investment. `None` before the first
    /// output-eligible date.
    pub contribution_month: Option<MonthKey>,
    pub splits_applied: usize,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescale every held primary-ETF share count. Invested cash is untouched.
    pub fn apply_primary_split(&mut self, factor: f64) {
        self.strategy1.apply_split(factor);
        self.strategy2.apply_split(factor);
        self.splits_applied += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> DayPrices {
        DayPrices {
            primary_etf: 100.0,
            dividend_etf: 40.0,
            growth_stock: 500.0,
        }
    }

    #[test]
    fn contribute_buys_fractional_shares() {
        let mut s1 = DcaDripState::default();
        s1.contribute(1_000.0, 300.0);
        assert!((s1.shares - 3.333_333_333).abs() < 1e-6);
        assert_eq!(s1.cash_invested, 1_000.0);
    }

    #[test]
    fn drip_buys_same_instrument() {
        let mut s1 = DcaDripState {
            shares: 1_000.0,
            cash_invested: 100_000.0,
        };
        let cash = s1.reinvest_dividend(5.0, 100.0);
        assert_eq!(cash, 5_000.0);
        assert!((s1.shares - 1_050.0).abs() < 1e-9);
        assert_eq!(s1.cash_invested, 100_000.0);
    }

    #[test]
    fn drip_without_shares_is_noop() {
        let mut s1 = DcaDripState::default();
        assert_eq!(s1.reinvest_dividend(5.0, 100.0), 0.0);
        assert_eq!(s1.shares, 0.0);
    }

    #[test]
    fn rotation_splits_cash_by_ratio() {
        let mut s2 = YieldRotationState {
            shares_dividend: 1_000.0,
            ..Default::default()
        };
        let cash = s2.rotate_dividend(2.0, &ReinvestRatios::new(30.0, 70.0), &prices());
        assert_eq!(cash, 2_000.0);
        // 600 / 500 growth, 1400 / 100 primary
        assert!((s2.shares_growth - 1.2).abs() < 1e-12);
        assert!((s2.shares_primary - 14.0).abs() < 1e-12);
        assert_eq!(s2.shares_dividend, 1_000.0);
    }

    #[test]
    fn derived_dividends_become_cash() {
        let mut s2 = YieldRotationState {
            shares_growth: 2.0,
            shares_primary: 10.0,
            ..Default::default()
        };
        s2.collect_derived_dividends(3.0, 1.5);
        assert!((s2.cash_balance - 21.0).abs() < 1e-12);
        assert_eq!(s2.shares_growth, 2.0);
        assert_eq!(s2.shares_primary, 10.0);
    }

    #[test]
    fn strategy2_value_includes_cash() {
        let s2 = YieldRotationState {
            shares_dividend: 10.0,
            shares_growth: 1.0,
            shares_primary: 2.0,
            cash_balance: 7.0,
            cash_invested: 0.0,
        };
        // 400 + 500 + 200 + 7
        assert_eq!(s2.value(&prices()), 1_107.0);
    }

    #[test]
    fn price_book_resolves_only_when_all_observed() {
        let mut book = PriceBook::default();
        assert!(book.resolve().is_none());
        book.observe(Instrument::PrimaryEtf, 100.0);
        book.observe(Instrument::DividendEtf, 40.0);
        assert!(book.resolve().is_none());
        book.observe(Instrument::GrowthStock, 500.0);
        assert_eq!(book.resolve(), Some(prices()));
    }

    #[test]
    fn split_touches_only_primary_holdings() {
        let mut state = SimulationState::new();
        state.strategy1.shares = 10.0;
        state.strategy1.cash_invested = 1_000.0;
        state.strategy2.shares_primary = 3.0;
        state.strategy2.shares_dividend = 50.0;
        state.apply_primary_split(4.0);
        assert_eq!(state.strategy1.shares, 40.0);
        assert_eq!(state.strategy1.cash_invested, 1_000.0);
        assert_eq!(state.strategy2.shares_primary, 12.0);
        assert_eq!(state.strategy2.shares_dividend, 50.0);
        assert_eq!(state.splits_applied, 1);
    }
}
