//! Immutable, indexed schedule snapshot.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{GtfsTime, Stop, StopId, StopTime, Trip, TripId, TripSummary};
use crate::geo::BoundingBox;

use super::error::DataError;

/// A departure index entry: when, which trip, and where in that trip.
#[derive(Debug, Clone)]
struct DepartureEntry {
    departure: GtfsTime,
    trip_id: TripId,
    position: usize,
}

/// A complete schedule held in memory.
///
/// Built once from feed records and never modified. Besides the stop and
/// trip tables it keeps two indexes:
/// - located stops sorted by latitude, for bounding-box scans
/// - per-stop departures sorted by time, for cutoff queries
#[derive(Debug, Default)]
pub struct Dataset {
    stops: HashMap<StopId, Stop>,
    by_latitude: Vec<(f64, StopId)>,
    trips: HashMap<TripId, Trip>,
    departures: HashMap<StopId, Vec<DepartureEntry>>,
}

/// Counts reported after building a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetStats {
    pub stops: usize,
    pub unlocated_stops: usize,
    pub trips: usize,
    pub stop_times: usize,
}

impl Dataset {
    /// Build a dataset from already-converted records.
    ///
    /// Stop times that reference an unknown trip or stop are dropped with a
    /// warning. Duplicate sequence numbers within a trip are an error.
    pub fn build(
        stops: Vec<Stop>,
        trips: Vec<TripSummary>,
        stop_times: Vec<StopTime>,
    ) -> Result<Self, DataError> {
        let mut stop_map: HashMap<StopId, Stop> = HashMap::with_capacity(stops.len());
        for stop in stops {
            if let Some(previous) = stop_map.insert(stop.id.clone(), stop) {
                warn!(stop_id = %previous.id, "duplicate stop id, keeping the later row");
            }
        }

        let mut summaries: HashMap<TripId, TripSummary> = HashMap::with_capacity(trips.len());
        for summary in trips {
            if let Some(previous) = summaries.insert(summary.trip_id.clone(), summary) {
                warn!(trip_id = %previous.trip_id, "duplicate trip id, keeping the later row");
            }
        }

        let mut grouped: HashMap<TripId, Vec<StopTime>> = HashMap::new();
        let mut orphaned = 0usize;
        for st in stop_times {
            if !summaries.contains_key(&st.trip_id) || !stop_map.contains_key(&st.stop_id) {
                orphaned += 1;
                continue;
            }
            grouped.entry(st.trip_id.clone()).or_default().push(st);
        }
        if orphaned > 0 {
            warn!(
                count = orphaned,
                "dropped stop times referencing unknown trips or stops"
            );
        }

        let mut trip_map: HashMap<TripId, Trip> = HashMap::with_capacity(summaries.len());
        for (trip_id, summary) in summaries {
            let times = grouped.remove(&trip_id).unwrap_or_default();
            let trip = Trip::new(summary, times)?;
            trip_map.insert(trip_id, trip);
        }

        let mut departures: HashMap<StopId, Vec<DepartureEntry>> = HashMap::new();
        for trip in trip_map.values() {
            for (position, st) in trip.stop_times().iter().enumerate() {
                departures
                    .entry(st.stop_id.clone())
                    .or_default()
                    .push(DepartureEntry {
                        departure: st.departure_time,
                        trip_id: trip.id().clone(),
                        position,
                    });
            }
        }
        for entries in departures.values_mut() {
            entries.sort_by(|a, b| {
                a.departure
                    .cmp(&b.departure)
                    .then_with(|| a.trip_id.cmp(&b.trip_id))
            });
        }

        let mut by_latitude: Vec<(f64, StopId)> = stop_map
            .values()
            .filter_map(|s| s.coordinate.map(|c| (c.lat(), s.id.clone())))
            .collect();
        by_latitude.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let dataset = Self {
            stops: stop_map,
            by_latitude,
            trips: trip_map,
            departures,
        };

        let stats = dataset.stats();
        debug!(
            stops = stats.stops,
            unlocated = stats.unlocated_stops,
            trips = stats.trips,
            stop_times = stats.stop_times,
            "built dataset indexes"
        );

        Ok(dataset)
    }

    /// Summary counts for logging.
    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            stops: self.stops.len(),
            unlocated_stops: self.stops.len() - self.by_latitude.len(),
            trips: self.trips.len(),
            stop_times: self.trips.values().map(|t| t.stop_times().len()).sum(),
        }
    }

    /// Look up a stop by id.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    /// Look up a trip by id.
    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.get(id)
    }

    /// Located stops inside a bounding box.
    ///
    /// Uses the latitude index to skip stops outside the box's latitude
    /// band, then checks longitude. Order is by latitude.
    pub fn stops_in_box(&self, bbox: &BoundingBox) -> impl Iterator<Item = &Stop> + '_ {
        let start = self
            .by_latitude
            .partition_point(|(lat, _)| *lat < bbox.min_lat);
        let end = self
            .by_latitude
            .partition_point(|(lat, _)| *lat <= bbox.max_lat);
        let bbox = *bbox;

        self.by_latitude[start..end.max(start)]
            .iter()
            .filter_map(|(_, id)| self.stops.get(id))
            .filter(move |stop| stop.coordinate.is_some_and(|c| bbox.contains(c)))
    }

    /// Departures from a stop at or after `cutoff`, earliest first.
    ///
    /// Equal departure times are ordered by trip id. At most `max_rows`
    /// entries are returned.
    pub fn departures_from(
        &self,
        stop: &StopId,
        cutoff: GtfsTime,
        max_rows: usize,
    ) -> impl Iterator<Item = (&Trip, &StopTime)> + '_ {
        let entries = self
            .departures
            .get(stop)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let start = entries.partition_point(|e| e.departure < cutoff);

        entries[start..]
            .iter()
            .take(max_rows)
            .filter_map(|e| {
                let trip = self.trips.get(&e.trip_id)?;
                let st = trip.stop_times().get(e.position)?;
                Some((trip, st))
            })
    }

    /// The stop visited last by a trip.
    pub fn terminal_stop(&self, trip: &TripId) -> Option<&Stop> {
        let terminal = self.trips.get(trip)?.terminal()?;
        self.stops.get(&terminal.stop_id)
    }
}
