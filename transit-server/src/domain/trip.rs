//! Trips and their stop times.

use super::{DomainError, GtfsTime, RouteId, StopId, TripId};

/// The parts of a trip shown alongside each departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSummary {
    pub trip_id: TripId,
    pub route_id: RouteId,
    /// Destination text displayed on the vehicle.
    pub headsign: String,
}

/// One scheduled visit of a trip to a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub arrival_time: GtfsTime,
    pub departure_time: GtfsTime,
}

/// A trip with its stop times in travel order.
///
/// Travel order is the order of `stop_sequence`, which is enforced at
/// construction. Sequence numbers need not be contiguous but must be
/// unique within the trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    summary: TripSummary,
    stop_times: Vec<StopTime>,
}

impl Trip {
    /// Build a trip, sorting its stop times by sequence.
    ///
    /// Fails if a stop time belongs to another trip or if two stop times
    /// share a sequence number.
    pub fn new(summary: TripSummary, mut stop_times: Vec<StopTime>) -> Result<Self, DomainError> {
        if let Some(foreign) = stop_times.iter().find(|st| st.trip_id != summary.trip_id) {
            return Err(DomainError::ForeignStopTime {
                trip: summary.trip_id.clone(),
                found: foreign.trip_id.clone(),
            });
        }

        stop_times.sort_by_key(|st| st.stop_sequence);

        if let Some(pair) = stop_times
            .windows(2)
            .find(|w| w[0].stop_sequence == w[1].stop_sequence)
        {
            return Err(DomainError::DuplicateStopSequence {
                trip: summary.trip_id.clone(),
                sequence: pair[0].stop_sequence,
            });
        }

        Ok(Self {
            summary,
            stop_times,
        })
    }

    pub fn summary(&self) -> &TripSummary {
        &self.summary
    }

    pub fn id(&self) -> &TripId {
        &self.summary.trip_id
    }

    /// Stop times ordered by sequence.
    pub fn stop_times(&self) -> &[StopTime] {
        &self.stop_times
    }

    /// The last stop visited, i.e. the stop time with the highest sequence.
    pub fn terminal(&self) -> Option<&StopTime> {
        self.stop_times.last()
    }
}
