//! Synthetic market data for development and demos.
//!
//! Results produced on synthetic data are tagged and should never be read as
//! evidence about real instruments.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use yieldlab_core::{Instrument, MarketData, MarketDataPoint};

/// Split ratio applied to the primary ETF at the midpoint of the range.
pub const SYNTHETIC_SPLIT_FACTOR: f64 = 4.0;

struct WalkProfile {
    start_price: f64,
    daily_drift: f64,
    daily_range: f64,
    /// Months (1-12) whose first trading day pays a dividend.
    payout_months: &'static [u32],
    /// Dividend per payout as a fraction of the day's price.
    payout_yield: f64,
}

fn profile(instrument: Instrument) -> WalkProfile {
    match instrument {
        Instrument::PrimaryEtf => WalkProfile {
            start_price: 120.0,
            daily_drift: 0.0004,
            daily_range: 0.02,
            payout_months: &[1, 7],
            payout_yield: 0.012,
        },
        Instrument::DividendEtf => WalkProfile {
            start_price: 35.0,
            daily_drift: 0.0001,
            daily_range: 0.015,
            payout_months: &[1, 4, 7, 10],
            payout_yield: 0.018,
        },
        Instrument::GrowthStock => WalkProfile {
            start_price: 550.0,
            daily_drift: 0.0007,
            daily_range: 0.03,
            payout_months: &[3, 6, 9, 12],
            payout_yield: 0.004,
        },
    }
}

/// Generate all three instrument series on weekdays in `[start, end]`.
///
/// Each instrument follows a seeded random walk with periodic dividends. The
/// primary ETF undergoes one 4:1 split at the midpoint of its series, which
/// shows up only as a price drop (no `split_factor` annotation).
/// Deterministic for a given `(start, end, seed)`.
pub fn generate_market_data(start: NaiveDate, end: NaiveDate, seed: u64) -> MarketData {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = MarketData::default();

    for instrument in Instrument::ALL {
        let mut series = random_walk(&profile(instrument), start, end, &mut rng);
        if instrument == Instrument::PrimaryEtf {
            apply_split_at_midpoint(&mut series, SYNTHETIC_SPLIT_FACTOR);
        }
        *data.series_mut(instrument) = series;
    }

    data
}

fn random_walk(
    profile: &WalkProfile,
    start: NaiveDate,
    end: NaiveDate,
    rng: &mut StdRng,
) -> Vec<MarketDataPoint> {
    let mut points = Vec::new();
    let mut price = profile.start_price;
    let mut date = start;
    let mut last_month: Option<u32> = None;

    while date <= end {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            let ret = profile.daily_drift + rng.gen_range(-profile.daily_range..profile.daily_range);
            price = (price * (1.0 + ret)).max(0.01);
            let close = (price * 100.0).round() / 100.0;

            let mut point = MarketDataPoint::new(date, close);
            let new_month = last_month != Some(date.month());
            if new_month && profile.payout_months.contains(&date.month()) {
                let dividend = (close * profile.payout_yield * 1000.0).round() / 1000.0;
                point = point.with_dividend(dividend);
            }
            last_month = Some(date.month());
            points.push(point);
        }
        date += Duration::days(1);
    }

    points
}

fn apply_split_at_midpoint(series: &mut [MarketDataPoint], factor: f64) {
    if series.len() < 2 {
        return;
    }
    let mid = series.len() / 2;
    for point in &mut series[mid..] {
        point.price = (point.price / factor * 100.0).round() / 100.0;
        point.dividend /= factor;
    }
}
