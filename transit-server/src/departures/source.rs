//! Upcoming departures at a stop.

use crate::domain::{GtfsTime, StopId, StopTime, TripSummary};
use crate::gtfs::DataError;

use super::data::TransitData;

/// One scheduled departure of a trip from a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub trip: TripSummary,
    pub stop_time: StopTime,
}

/// Departures fetched for one stop.
#[derive(Debug, Clone, Default)]
pub struct StopDepartures {
    pub departures: Vec<Departure>,
    /// The row cap was reached, so later departures may be missing.
    pub truncated: bool,
}

/// Time-filtered access to scheduled departures.
pub struct DepartureSource<'a, D: TransitData> {
    data: &'a D,
}

impl<'a, D: TransitData> DepartureSource<'a, D> {
    pub fn new(data: &'a D) -> Self {
        Self { data }
    }

    /// At most `max_rows` departures from `stop` at or after `cutoff`,
    /// earliest first.
    ///
    /// Times past midnight ("25:05:00") sort after every same-day time, so
    /// they are kept for any cutoff below them.
    pub fn upcoming_departures(
        &self,
        stop: &StopId,
        cutoff: GtfsTime,
        max_rows: usize,
    ) -> Result<StopDepartures, DataError> {
        let rows = self.data.departures_at(stop, cutoff, max_rows)?;
        let truncated = max_rows > 0 && rows.len() >= max_rows;

        let mut departures: Vec<Departure> = rows
            .into_iter()
            .filter(|(_, st)| st.departure_time >= cutoff)
            .map(|(trip, stop_time)| Departure { trip, stop_time })
            .collect();
        departures.sort_by_key(|d| d.stop_time.departure_time);

        Ok(StopDepartures {
            departures,
            truncated,
        })
    }
}
