//! Criterion benchmarks for YieldLab hot paths.
//!
//! Benchmarks:
//! 1. Full two-strategy simulation over multi-year daily series
//! 2. Series alignment alone
//! 3. Metrics post-pass

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use yieldlab_core::data::align_series;
use yieldlab_core::{run_backtest, MarketData, MarketDataPoint, PortfolioMetrics, SimulationParams};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(days: usize, base: f64, phase: f64, dividend_every: usize) -> Vec<MarketDataPoint> {
    let start = NaiveDate::from_ymd_opt(2010, 1, 4).unwrap();
    (0..days as i64)
        .map(|i| start + Duration::days(i))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .enumerate()
        .map(|(i, date)| {
            let price = base + (i as f64 * 0.05 + phase).sin() * base * 0.1;
            let point = MarketDataPoint::new(date, price);
            if dividend_every > 0 && i % dividend_every == dividend_every - 1 {
                point.with_dividend(base * 0.01)
            } else {
                point
            }
        })
        .collect()
}

fn make_data(calendar_days: usize) -> MarketData {
    MarketData {
        primary_etf: make_series(calendar_days, 120.0, 0.0, 126),
        dividend_etf: make_series(calendar_days, 35.0, 1.0, 63),
        growth_stock: make_series(calendar_days, 600.0, 2.0, 63),
    }
}

fn params() -> SimulationParams {
    SimulationParams {
        start_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2100, 1, 1).unwrap(),
        ..Default::default()
    }
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_backtest");
    for years in [1usize, 5, 15] {
        let data = make_data(years * 365);
        let params = params();
        group.bench_with_input(BenchmarkId::from_parameter(years), &data, |b, data| {
            b.iter(|| run_backtest(black_box(&params), black_box(data)))
        });
    }
    group.finish();
}

fn bench_alignment(c: &mut Criterion) {
    let data = make_data(15 * 365);
    c.bench_function("align_series_15y", |b| {
        b.iter(|| align_series(black_box(&data)).len())
    });
}

fn bench_metrics(c: &mut Criterion) {
    let values: Vec<f64> = (0..3_780)
        .map(|i| 100_000.0 + (i as f64 * 0.03).sin() * 5_000.0 + i as f64 * 10.0)
        .collect();
    let benchmark: Vec<f64> = values.iter().map(|v| v * 0.98).collect();
    c.bench_function("portfolio_metrics_15y", |b| {
        b.iter(|| PortfolioMetrics::compute(black_box(&values), 400_000.0, black_box(&benchmark)))
    });
}

criterion_group!(benches, bench_simulation, bench_alignment, bench_metrics);
criterion_main!(benches);
