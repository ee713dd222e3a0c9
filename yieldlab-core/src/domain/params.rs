//! Simulation parameters and their validation.
//!
//! The engine trusts its parameters. Callers run [`SimulationParams::validate`]
//! before invoking it; a ratio pair that does not sum to 100 must never reach
//! the simulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance when checking that the two reinvest ratios sum to 100.
const RATIO_SUM_TOLERANCE: f64 = 1e-9;

/// Errors from parameter validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("reinvest ratios must sum to 100% (growth {growth}% + primary {primary}% = {}%)", .growth + .primary)]
    RatiosDoNotSumTo100 { growth: f64, primary: f64 },

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NonFiniteValue { field: &'static str },

    #[error("start date {start} is after end date {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}

/// How Strategy 2 splits dividend-ETF cash, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReinvestRatios {
    pub growth_stock: f64,
    #[serde(rename = "primaryETF")]
    pub primary_etf: f64,
}

impl ReinvestRatios {
    pub fn new(growth_stock: f64, primary_etf: f64) -> Self {
        Self {
            growth_stock,
            primary_etf,
        }
    }

    pub fn growth_fraction(&self) -> f64 {
        self.growth_stock / 100.0
    }

    pub fn primary_fraction(&self) -> f64 {
        self.primary_etf / 100.0
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        for (field, value) in [
            ("reinvest_ratios.growth_stock", self.growth_stock),
            ("reinvest_ratios.primary_etf", self.primary_etf),
        ] {
            if !value.is_finite() {
                return Err(ParamsError::NonFiniteValue { field });
            }
            if value < 0.0 {
                return Err(ParamsError::NegativeAmount { field, value });
            }
        }
        if (self.growth_stock + self.primary_etf - 100.0).abs() > RATIO_SUM_TOLERANCE {
            return Err(ParamsError::RatiosDoNotSumTo100 {
                growth: self.growth_stock,
                primary: self.primary_etf,
            });
        }
        Ok(())
    }
}

impl Default for ReinvestRatios {
    fn default() -> Self {
        Self::new(30.0, 70.0)
    }
}

/// Inputs of a single comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    pub initial_principal: f64,
    pub monthly_contribution: f64,
    /// First date (inclusive) the simulation may use.
    pub start_date: NaiveDate,
    /// Last date (inclusive) the simulation may use.
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reinvest_ratios: ReinvestRatios,
}

impl SimulationParams {
    /// Whether `date` falls inside the simulation window.
    pub fn window_contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        for (field, value) in [
            ("initial_principal", self.initial_principal),
            ("monthly_contribution", self.monthly_contribution),
        ] {
            if !value.is_finite() {
                return Err(ParamsError::NonFiniteValue { field });
            }
            if value < 0.0 {
                return Err(ParamsError::NegativeAmount { field, value });
            }
        }
        if self.start_date > self.end_date {
            return Err(ParamsError::InvalidWindow {
                start: self.start_date,
                end: self.end_date,
            });
        }
        self.reinvest_ratios.validate()
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_principal: 100_000.0,
            monthly_contribution: 10_000.0,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid constant date"),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid constant date"),
            reinvest_ratios: ReinvestRatios::default(),
        }
    }
}
