//! Serializable run configuration (TOML).
//!
//! ```toml
//! [simulation]
//! initial_principal = 100000.0
//! monthly_contribution = 10000.0
//! start_date = "2023-01-01"
//! end_date = "2025-12-01"
//!
//! [simulation.reinvest_ratios]
//! growth_stock = 30.0
//! primary_etf = 70.0
//!
//! [data]
//! primary_etf = "data/0050.csv"
//! dividend_etf = "data/0056.csv"
//! growth_stock = "data/2330.csv"
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use yieldlab_core::{Instrument, ParamsError, ReinvestRatios, SimulationParams};

/// Unique identifier for a run configuration (content-addressable hash).
pub type RunId = String;

/// Errors from reading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid simulation parameters: {0}")]
    Params(#[from] ParamsError),
}

/// Complete configuration for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub simulation: SimulationSection,

    /// CSV sources. Absent when running on synthetic data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataPaths>,
}

/// `[simulation]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSection {
    #[serde(default = "default_principal")]
    pub initial_principal: f64,
    #[serde(default = "default_contribution")]
    pub monthly_contribution: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reinvest_ratios: RatiosSection,
}

/// `[simulation.reinvest_ratios]` section, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatiosSection {
    pub growth_stock: f64,
    pub primary_etf: f64,
}

impl Default for RatiosSection {
    fn default() -> Self {
        let ratios = ReinvestRatios::default();
        Self {
            growth_stock: ratios.growth_stock,
            primary_etf: ratios.primary_etf,
        }
    }
}

/// `[data]` section: one CSV file per instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    pub primary_etf: PathBuf,
    pub dividend_etf: PathBuf,
    pub growth_stock: PathBuf,
}

impl DataPaths {
    pub fn path(&self, instrument: Instrument) -> &Path {
        match instrument {
            Instrument::PrimaryEtf => &self.primary_etf,
            Instrument::DividendEtf => &self.dividend_etf,
            Instrument::GrowthStock => &self.growth_stock,
        }
    }

    /// Resolve relative paths against `base` (the config file's directory).
    pub fn resolve_relative(&mut self, base: &Path) {
        for path in [
            &mut self.primary_etf,
            &mut self.dividend_etf,
            &mut self.growth_stock,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

fn default_principal() -> f64 {
    SimulationParams::default().initial_principal
}

fn default_contribution() -> f64 {
    SimulationParams::default().monthly_contribution
}

impl BacktestConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file. Relative data paths are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let (Some(data), Some(base)) = (config.data.as_mut(), path.parent()) {
            data.resolve_relative(base);
        }
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Engine parameters described by the `[simulation]` section.
    pub fn to_params(&self) -> SimulationParams {
        let sim = &self.simulation;
        SimulationParams {
            initial_principal: sim.initial_principal,
            monthly_contribution: sim.monthly_contribution,
            start_date: sim.start_date,
            end_date: sim.end_date,
            reinvest_ratios: ReinvestRatios::new(
                sim.reinvest_ratios.growth_stock,
                sim.reinvest_ratios.primary_etf,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_params().validate()?;
        Ok(())
    }

    /// Deterministic hash of this configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        let params = SimulationParams::default();
        Self {
            simulation: SimulationSection {
                initial_principal: params.initial_principal,
                monthly_contribution: params.monthly_contribution,
                start_date: params.start_date,
                end_date: params.end_date,
                reinvest_ratios: RatiosSection::default(),
            },
            data: Some(DataPaths {
                primary_etf: PathBuf::from("data/primary_etf.csv"),
                dividend_etf: PathBuf::from("data/dividend_etf.csv"),
                growth_stock: PathBuf::from("data/growth_stock.csv"),
            }),
        }
    }
}
