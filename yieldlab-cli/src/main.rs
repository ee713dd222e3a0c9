//! YieldLab CLI: run, sweep, and config commands.
//!
//! Commands:
//! - `run`: compare both strategies from a TOML config (or synthetic data)
//! - `sweep`: rerun Strategy 2 across reinvest-ratio pairs
//! - `init-config`: write a default config file

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use yieldlab_core::metrics::max_drawdown_percent;
use yieldlab_core::PortfolioMetrics;
use yieldlab_runner::data_loader::load_market_data;
use yieldlab_runner::runner::run_from_config;
use yieldlab_runner::sweep::{best_by_final_value, sweep_ratios, RatioGrid, SweepEntry};
use yieldlab_runner::{save_artifacts, BacktestConfig, LoadOptions, RunReport};

#[derive(Parser)]
#[command(
    name = "yieldlab",
    about = "YieldLab CLI: DCA with DRIP vs. dividend rotation backtests"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both strategies and print a side-by-side summary.
    Run {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use deterministic synthetic market data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for synthetic data.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Override the start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Override the end date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Print the summary only; write no artifacts.
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Sweep Strategy 2 over growth/primary reinvest ratios.
    Sweep {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use deterministic synthetic market data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for synthetic data.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Growth-ratio step in percentage points.
        #[arg(long, default_value_t = 10.0)]
        step: f64,
    },
    /// Write a default config file.
    InitConfig {
        /// Destination path.
        #[arg(long, default_value = "yieldlab.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            synthetic,
            seed,
            start,
            end,
            output_dir,
            no_save,
        } => run_cmd(
            config.as_deref(),
            synthetic,
            seed,
            start.as_deref(),
            end.as_deref(),
            &output_dir,
            no_save,
        ),
        Commands::Sweep {
            config,
            synthetic,
            seed,
            step,
        } => sweep_cmd(config.as_deref(), synthetic, seed, step),
        Commands::InitConfig { path, force } => init_config_cmd(&path, force),
    }
}

fn parse_date(raw: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid {flag} date '{raw}' (expected YYYY-MM-DD)"))
}

fn load_config(path: Option<&Path>, synthetic: bool) -> Result<BacktestConfig> {
    match path {
        Some(p) => BacktestConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None if synthetic => Ok(BacktestConfig {
            data: None,
            ..BacktestConfig::default()
        }),
        None => bail!("one of --config or --synthetic is required"),
    }
}

fn load_options(config: &BacktestConfig, synthetic: bool, seed: u64) -> LoadOptions {
    LoadOptions {
        start: config.simulation.start_date,
        end: config.simulation.end_date,
        synthetic,
        seed,
    }
}

fn run_cmd(
    config_path: Option<&Path>,
    synthetic: bool,
    seed: u64,
    start: Option<&str>,
    end: Option<&str>,
    output_dir: &Path,
    no_save: bool,
) -> Result<()> {
    let mut config = load_config(config_path, synthetic)?;
    if let Some(s) = start {
        config.simulation.start_date = parse_date(s, "--start")?;
    }
    if let Some(e) = end {
        config.simulation.end_date = parse_date(e, "--end")?;
    }

    let opts = load_options(&config, synthetic, seed);
    let report = run_from_config(&config, &opts)?;
    print_summary(&report);

    if !no_save {
        let dir = save_artifacts(&report, output_dir)?;
        println!("Artifacts saved to {}", dir.display());
    }
    Ok(())
}

fn sweep_cmd(config_path: Option<&Path>, synthetic: bool, seed: u64, step: f64) -> Result<()> {
    let config = load_config(config_path, synthetic)?;
    config.validate()?;
    let grid = RatioGrid::new(step)?;

    let opts = load_options(&config, synthetic, seed);
    let loaded = load_market_data(config.data.as_ref(), &opts)?;
    let entries = sweep_ratios(&config.to_params(), &loaded.data, &grid)?;

    print_sweep_table(&entries);
    if loaded.has_synthetic {
        println!("WARNING: Results based on SYNTHETIC data");
    }
    Ok(())
}

fn init_config_cmd(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    tracing::debug!(path = %path.display(), force, "writing default config");
    let toml = BacktestConfig::default().to_toml()?;
    std::fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn print_summary(report: &RunReport) {
    let result = &report.result;
    let params = &report.params;

    println!();
    println!("=== Strategy Comparison ===");
    match result.date_range() {
        Some((first, last)) => println!(
            "Period:         {} to {} ({} days)",
            first,
            last,
            result.daily_data.len()
        ),
        None => {
            println!("Period:         no simulated days in {} to {}", params.start_date, params.end_date);
            println!();
            return;
        }
    }
    println!(
        "Reinvest split: {:.1}% growth / {:.1}% primary ETF",
        params.reinvest_ratios.growth_stock, params.reinvest_ratios.primary_etf
    );
    println!("Run ID:         {}", report.run_id);
    println!();

    let dd1 = max_drawdown_percent(&result.portfolio1_values());
    let dd2 = max_drawdown_percent(&result.portfolio2_values());
    print_metrics_table(&result.metrics1, &result.metrics2, dd1, dd2);

    if report.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}

fn print_metrics_table(m1: &PortfolioMetrics, m2: &PortfolioMetrics, dd1: f64, dd2: f64) {
    println!("{:<22} {:>18} {:>18}", "", "DCA + DRIP", "Yield rotation");
    println!(
        "{:<22} {:>18.2} {:>18.2}",
        "Total invested", m1.total_invested, m2.total_invested
    );
    println!(
        "{:<22} {:>18.2} {:>18.2}",
        "Final value", m1.final_value, m2.final_value
    );
    println!(
        "{:<22} {:>17.2}% {:>17.2}%",
        "Total return", m1.total_return_percent, m2.total_return_percent
    );
    println!(
        "{:<22} {:>17.2}% {:>17.2}%",
        "Volatility (ann.)", m1.annualized_volatility_percent, m2.annualized_volatility_percent
    );
    println!("{:<22} {:>18.2} {:>18.2}", "Beta", m1.beta, m2.beta);
    println!("{:<22} {:>17.2}% {:>17.2}%", "Max drawdown", dd1, dd2);
}

fn print_sweep_table(entries: &[SweepEntry]) {
    let best = best_by_final_value(entries).map(|e| e.ratios);

    println!();
    println!("=== Reinvest Ratio Sweep (Strategy 2) ===");
    println!(
        "{:>8} {:>8} {:>16} {:>10} {:>10} {:>6}",
        "growth%", "primary%", "final value", "return%", "vol%", "beta"
    );
    for e in entries {
        let marker = if Some(e.ratios) == best { " *" } else { "" };
        println!(
            "{:>8.1} {:>8.1} {:>16.2} {:>10.2} {:>10.2} {:>6.2}{marker}",
            e.ratios.growth_stock,
            e.ratios.primary_etf,
            e.metrics2.final_value,
            e.metrics2.total_return_percent,
            e.metrics2.annualized_volatility_percent,
            e.metrics2.beta,
        );
    }
    println!();
}
