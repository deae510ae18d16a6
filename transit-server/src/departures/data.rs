//! What the query core needs from the data-access layer.
//!
//! These traits allow the core to be tested with in-memory fixtures and
//! keep it ignorant of how the schedule is stored.

use crate::domain::{GtfsTime, Stop, StopId, StopTime, Trip, TripId, TripSummary};
use crate::geo::BoundingBox;
use crate::gtfs::DataError;

/// Read-only access to one schedule snapshot.
pub trait TransitData {
    /// Stops whose coordinates fall inside `bbox`.
    ///
    /// Stops without coordinates are never returned.
    fn stops_in_box(&self, bbox: &BoundingBox) -> Result<Vec<Stop>, DataError>;

    /// Stop times at `stop` departing at or after `cutoff`, with their trip.
    ///
    /// Results are ordered by departure time and hold at most `max_rows`
    /// entries.
    fn departures_at(
        &self,
        stop: &StopId,
        cutoff: GtfsTime,
        max_rows: usize,
    ) -> Result<Vec<(TripSummary, StopTime)>, DataError>;

    /// A stop by id, if known.
    fn stop(&self, id: &StopId) -> Result<Option<Stop>, DataError>;

    /// The stop visited last by `trip`, if the trip and stop are known.
    fn terminal_stop(&self, trip: &TripId) -> Result<Option<Stop>, DataError>;

    /// A trip with all its stop times, if known.
    fn trip(&self, trip: &TripId) -> Result<Option<Trip>, DataError>;
}

/// A source of per-query read handles.
///
/// Each query opens its own handle and drops it before returning, so no
/// handle outlives a request.
pub trait DataSource {
    type Reader: TransitData;

    /// Acquire a read handle.
    fn open(&self) -> Result<Self::Reader, DataError>;
}
