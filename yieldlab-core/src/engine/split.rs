//! Stock-split detection for the primary ETF.
//!
//! A split multiplies share count and divides price. Without correction the
//! day-by-day valuation would book a phantom 55–80% loss on split day. When an
//! observation carries explicit split metadata it is used directly; otherwise
//! a price-ratio heuristic decides.

use serde::{Deserialize, Serialize};

use crate::domain::MarketDataPoint;

/// A new price below this fraction of the previous known price is treated as a split.
pub const SPLIT_THRESHOLD: f64 = 0.45;

/// Relative gap between an annotated factor and the observed price ratio that gets logged.
pub const METADATA_MISMATCH_TOLERANCE: f64 = 0.25;

/// Where a split factor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSource {
    /// `split_factor` annotation on the observation.
    Metadata,
    /// Rounded ratio of previous price to current price.
    PriceHeuristic,
}

/// A detected split: multiply every held share count by `factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitEvent {
    pub factor: f64,
    pub source: SplitSource,
}

/// Check one genuine observation against the previous known price.
///
/// `previous` must be the last *observed* price (not a carried-forward one);
/// callers re-baseline after every observation so that splits in adjacent
/// observations are detected independently.
pub fn detect_split(previous: Option<f64>, observation: &MarketDataPoint) -> Option<SplitEvent> {
    if let Some(factor) = observation.split_factor {
        if factor.is_finite() && factor > 1.0 {
            if let Some(prev) = previous.filter(|p| p.is_finite() && *p > 0.0) {
                if observation.is_priced() {
                    let implied = prev / observation.price;
                    if (implied / factor - 1.0).abs() > METADATA_MISMATCH_TOLERANCE {
                        tracing::warn!(
                            date = %observation.date,
                            factor,
                            implied,
                            "split annotation disagrees with price move; applying annotation"
                        );
                    }
                }
            }
            return Some(SplitEvent {
                factor,
                source: SplitSource::Metadata,
            });
        }
    }

    let previous = previous.filter(|p| p.is_finite() && *p > 0.0)?;
    let current = observation.price;
    if !observation.is_priced() || current >= previous * SPLIT_THRESHOLD {
        return None;
    }

    let factor = (previous / current).round();
    (factor > 1.0).then_some(SplitEvent {
        factor,
        source: SplitSource::PriceHeuristic,
    })
}
