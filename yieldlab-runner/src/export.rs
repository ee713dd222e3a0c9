//! Artifact export: JSON report, daily value CSV, metrics CSV.
//!
//! The JSON report carries `schema_version`. Newer versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use yieldlab_core::metrics::max_drawdown_percent;
use yieldlab_core::{DailyResult, PortfolioMetrics};

use crate::runner::{RunReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `RunReport` to pretty JSON.
pub fn export_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize RunReport to JSON")
}

/// Deserialize a `RunReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<RunReport> {
    let report: RunReport =
        serde_json::from_str(json).context("failed to deserialize RunReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One row per simulated day.
///
/// Columns: date, portfolio1_value, portfolio2_value, invested_amount_to_date
pub fn export_daily_csv(daily: &[DailyResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "portfolio1_value",
        "portfolio2_value",
        "invested_amount_to_date",
    ])?;
    for day in daily {
        wtr.write_record([
            &day.date.to_string(),
            &format!("{:.2}", day.portfolio1_value),
            &format!("{:.2}", day.portfolio2_value),
            &format!("{:.2}", day.invested_amount_to_date),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// One row per strategy.
///
/// Columns: strategy, total_invested, final_value, total_return_percent,
/// annualized_volatility_percent, beta, max_drawdown_percent
pub fn export_metrics_csv(report: &RunReport) -> Result<String> {
    let result = &report.result;
    let rows: [(&str, &PortfolioMetrics, Vec<f64>); 2] = [
        ("dca_drip", &result.metrics1, result.portfolio1_values()),
        ("yield_rotation", &result.metrics2, result.portfolio2_values()),
    ];

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "strategy",
        "total_invested",
        "final_value",
        "total_return_percent",
        "annualized_volatility_percent",
        "beta",
        "max_drawdown_percent",
    ])?;
    for (name, m, values) in &rows {
        wtr.write_record([
            name.to_string(),
            format!("{:.2}", m.total_invested),
            format!("{:.2}", m.final_value),
            format!("{:.4}", m.total_return_percent),
            format!("{:.4}", m.annualized_volatility_percent),
            format!("{:.2}", m.beta),
            format!("{:.4}", max_drawdown_percent(values)),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one run.
///
/// Creates `{run_id prefix}_{timestamp}/` under `output_dir` containing:
/// - `report.json`: the full `RunReport`
/// - `daily.csv`: per-day values of both strategies
/// - `metrics.csv`: summary metrics per strategy
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &RunReport, output_dir: &Path) -> Result<PathBuf> {
    let prefix: String = report.run_id.chars().take(12).collect();
    let dirname = format!(
        "{}_{}",
        prefix,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(report)?;
    std::fs::write(run_dir.join("report.json"), &json)?;

    let daily_csv = export_daily_csv(&report.result.daily_data)?;
    std::fs::write(run_dir.join("daily.csv"), &daily_csv)?;

    let metrics_csv = export_metrics_csv(report)?;
    std::fs::write(run_dir.join("metrics.csv"), &metrics_csv)?;

    tracing::info!(dir = %run_dir.display(), "saved artifacts");
    Ok(run_dir)
}

/// Load a `RunReport` from an artifact directory's report.json.
pub fn load_artifacts(dir: &Path) -> Result<RunReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use yieldlab_core::{BacktestResult, SimulationParams};

    fn sample_report() -> RunReport {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let daily_data = vec![
            DailyResult {
                date: d1,
                portfolio1_value: 100_000.0,
                portfolio2_value: 100_000.0,
                invested_amount_to_date: 100_000.0,
            },
            DailyResult {
                date: d2,
                portfolio1_value: 90_000.0,
                portfolio2_value: 101_000.0,
                invested_amount_to_date: 100_000.0,
            },
        ];
        let v1: Vec<f64> = daily_data.iter().map(|d| d.portfolio1_value).collect();
        let v2: Vec<f64> = daily_data.iter().map(|d| d.portfolio2_value).collect();
        RunReport {
            schema_version: SCHEMA_VERSION,
            run_id: "0123456789abcdef0123".into(),
            dataset_hash: "feedbeef".into(),
            has_synthetic: false,
            params: SimulationParams::default(),
            result: BacktestResult {
                metrics1: PortfolioMetrics::compute(&v1, 100_000.0, &v1),
                metrics2: PortfolioMetrics::compute(&v2, 100_000.0, &v1),
                daily_data,
            },
        }
    }

    fn assert_same_report(a: &RunReport, b: &RunReport) {
        assert_eq!(a.run_id, b.run_id);
        assert_eq!(a.dataset_hash, b.dataset_hash);
        assert_eq!(a.params, b.params);
        assert_eq!(a.result.daily_data, b.result.daily_data);
        for (x, y) in [
            (&a.result.metrics1, &b.result.metrics1),
            (&a.result.metrics2, &b.result.metrics2),
        ] {
            assert!((x.final_value - y.final_value).abs() < 1e-10);
            assert!((x.total_return_percent - y.total_return_percent).abs() < 1e-10);
            assert!((x.annualized_volatility_percent - y.annualized_volatility_percent).abs() < 1e-10);
            assert!((x.beta - y.beta).abs() < 1e-10);
        }
    }

    // ─── JSON ───────────────────────────────────────────────────────

    #[test]
    fn json_roundtrip() {
        let report = sample_report();
        let json = export_json(&report).unwrap();
        assert_same_report(&import_json(&json).unwrap(), &report);
    }

    #[test]
    fn json_uses_camel_case_result_fields() {
        let json = export_json(&sample_report()).unwrap();
        assert!(json.contains("\"dailyData\""));
        assert!(json.contains("\"portfolio1Value\""));
        assert!(json.contains("\"totalReturnPercent\""));
        assert!(json.contains("\"primaryETF\""));
    }

    #[test]
    fn json_rejects_unknown_version() {
        let mut report = sample_report();
        report.schema_version = SCHEMA_VERSION + 1;
        let json = serde_json::to_string(&report).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn json_without_version_defaults_to_current() {
        let report = sample_report();
        let mut value = serde_json::to_value(&report).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let loaded = import_json(&value.to_string()).unwrap();
        assert_eq!(loaded.schema_version, SCHEMA_VERSION);
    }

    // ─── CSV ────────────────────────────────────────────────────────

    #[test]
    fn daily_csv_content() {
        let csv = export_daily_csv(&sample_report().result.daily_data).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "date,portfolio1_value,portfolio2_value,invested_amount_to_date"
        );
        assert_eq!(lines[2], "2024-01-03,90000.00,101000.00,100000.00");
    }

    #[test]
    fn daily_csv_empty() {
        let csv = export_daily_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn metrics_csv_has_both_strategies() {
        let csv = export_metrics_csv(&sample_report()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("dca_drip,100000.00,90000.00,-10.0000"));
        // 10% peak-to-trough on strategy 1.
        assert!(lines[1].ends_with(",-10.0000"));
        assert!(lines[2].starts_with("yield_rotation,100000.00,101000.00,1.0000"));
    }

    // ─── Save/load artifacts ────────────────────────────────────────

    #[test]
    fn save_load_artifacts_roundtrip() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(&report, dir.path()).unwrap();

        assert!(run_dir.join("report.json").exists());
        assert!(run_dir.join("daily.csv").exists());
        assert!(run_dir.join("metrics.csv").exists());

        let name = run_dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("0123456789ab_"));

        let loaded = load_artifacts(&run_dir).unwrap();
        assert_eq!(loaded.schema_version, SCHEMA_VERSION);
        assert_same_report(&loaded, &report);
    }

    #[test]
    fn load_artifacts_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_artifacts(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("report.json"));
    }
}
