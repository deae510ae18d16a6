//! Direction check: does a trip bring the rider closer to the destination?

use std::collections::HashMap;

use crate::domain::{Coordinate, TripId};
use crate::geo::distance_km;
use crate::gtfs::DataError;

use super::data::TransitData;

/// Whether a trip ending at `terminal` heads from `origin` toward
/// `destination`.
///
/// True when the terminal is strictly closer to the destination than to the
/// origin. This says nothing about whether the trip passes near the
/// destination on the way.
pub fn heading_toward(terminal: Coordinate, origin: Coordinate, destination: Coordinate) -> bool {
    distance_km(destination, terminal) < distance_km(origin, terminal)
}

/// Per-query direction filter.
///
/// Verdicts are remembered per trip, so a trip serving several candidate
/// stops costs one terminal lookup.
pub struct DirectionFilter<'a, D: TransitData> {
    data: &'a D,
    origin: Coordinate,
    destination: Coordinate,
    verdicts: HashMap<TripId, bool>,
}

impl<'a, D: TransitData> DirectionFilter<'a, D> {
    pub fn new(data: &'a D, origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            data,
            origin,
            destination,
            verdicts: HashMap::new(),
        }
    }

    /// Whether `trip` heads toward the destination.
    ///
    /// Trips with no known terminal, or whose terminal has no coordinates,
    /// are rejected.
    pub fn is_heading_toward(&mut self, trip: &TripId) -> Result<bool, DataError> {
        if let Some(&verdict) = self.verdicts.get(trip) {
            return Ok(verdict);
        }

        let verdict = self
            .data
            .terminal_stop(trip)?
            .and_then(|stop| stop.coordinate)
            .is_some_and(|terminal| heading_toward(terminal, self.origin, self.destination));

        self.verdicts.insert(trip.clone(), verdict);
        Ok(verdict)
    }

    /// Number of distinct trips checked so far.
    pub fn checked(&self) -> usize {
        self.verdicts.len()
    }
}
