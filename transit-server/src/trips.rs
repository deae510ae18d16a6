//! Trip details: every stop a trip calls at, in order.

use crate::departures::{DataSource, TransitData};
use crate::domain::{Coordinate, StartTime, StopId, TripId, TripSummary};
use crate::gtfs::DataError;

/// One call of a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripCall {
    pub stop_id: StopId,
    pub stop_name: String,
    pub coordinate: Option<Coordinate>,
    pub arrival_timestamp: String,
    pub departure_timestamp: String,
}

/// A trip and its calls in stop-sequence order.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDetails {
    pub summary: TripSummary,
    pub calls: Vec<TripCall>,
}

/// Look up a trip, stitching its times onto `date`'s date.
///
/// Returns `None` for an unknown trip.
pub fn trip_details<S: DataSource>(
    source: &S,
    trip_id: &TripId,
    date: &StartTime,
) -> Result<Option<TripDetails>, DataError> {
    let reader = source.open()?;
    let Some(trip) = reader.trip(trip_id)? else {
        return Ok(None);
    };

    let mut calls = Vec::with_capacity(trip.stop_times().len());
    for st in trip.stop_times() {
        let stop = reader.stop(&st.stop_id)?;
        let (stop_name, coordinate) = match stop {
            Some(stop) => (stop.name, stop.coordinate),
            None => (st.stop_id.to_string(), None),
        };
        calls.push(TripCall {
            stop_id: st.stop_id.clone(),
            stop_name,
            coordinate,
            arrival_timestamp: date.stitch(st.arrival_time),
            departure_timestamp: date.stitch(st.departure_time),
        });
    }

    Ok(Some(TripDetails {
        summary: trip.summary().clone(),
        calls,
    }))
}
