//! Multi-series time alignment.
//!
//! Given the three instrument series, build the union of their dates and a
//! per-instrument date lookup. No gap filling happens here; a missing point
//! stays missing and the simulator decides what to carry forward.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use crate::domain::{Instrument, MarketData, MarketDataPoint};

/// The three series on a common date axis.
#[derive(Debug)]
pub struct AlignedSeries<'a> {
    /// Union of every date seen in any series (sorted ascending, distinct).
    pub dates: Vec<NaiveDate>,
    lookups: [HashMap<NaiveDate, &'a MarketDataPoint>; 3],
}

impl<'a> AlignedSeries<'a> {
    /// The raw point for `instrument` on `date`, if that series has one.
    pub fn point(&self, instrument: Instrument, date: NaiveDate) -> Option<&'a MarketDataPoint> {
        self.lookups[instrument.index()].get(&date).copied()
    }

    /// Like [`point`](Self::point), but only genuine observations (positive price).
    pub fn observation(
        &self,
        instrument: Instrument,
        date: NaiveDate,
    ) -> Option<&'a MarketDataPoint> {
        self.point(instrument, date).filter(|p| p.is_priced())
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Align the three series of `data` onto their date union.
///
/// When a series repeats a date, the later point wins.
pub fn align_series(data: &MarketData) -> AlignedSeries<'_> {
    let mut all_dates = BTreeSet::new();
    let mut lookups: [HashMap<NaiveDate, &MarketDataPoint>; 3] = Default::default();

    for instrument in Instrument::ALL {
        let series = data.series(instrument);
        let lookup = &mut lookups[instrument.index()];
        lookup.reserve(series.len());
        for point in series {
            all_dates.insert(point.date);
            lookup.insert(point.date, point);
        }
    }

    AlignedSeries {
        dates: all_dates.into_iter().collect(),
        lookups,
    }
}
