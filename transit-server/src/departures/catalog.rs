//! Nearby-stop search.

use std::cmp::Ordering;

use crate::domain::{Coordinate, Stop};
use crate::geo::{BoundingBox, distance_km};
use crate::gtfs::DataError;

use super::data::TransitData;

/// A stop within the search radius, with its distance from the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStop {
    pub stop: Stop,
    /// Position of the stop. Always present; unlocated stops never match.
    pub coordinate: Coordinate,
    pub distance_km: f64,
}

/// Spatial access to the stop set.
pub struct StopCatalog<'a, D: TransitData> {
    data: &'a D,
}

impl<'a, D: TransitData> StopCatalog<'a, D> {
    pub fn new(data: &'a D) -> Self {
        Self { data }
    }

    /// Stops within `radius_km` of `origin`, nearest first.
    ///
    /// Candidates come from a bounding-box scan and are then checked against
    /// the exact great-circle distance. Stops at equal distance are ordered
    /// by id.
    pub fn nearby_stops(
        &self,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<NearbyStop>, DataError> {
        let bbox = BoundingBox::around(origin, radius_km);

        let mut nearby: Vec<NearbyStop> = self
            .data
            .stops_in_box(&bbox)?
            .into_iter()
            .filter_map(|stop| {
                let coordinate = stop.coordinate?;
                let distance_km = distance_km(origin, coordinate);
                (distance_km <= radius_km).then_some(NearbyStop {
                    stop,
                    coordinate,
                    distance_km,
                })
            })
            .collect();

        nearby.sort_by(by_distance);
        Ok(nearby)
    }
}

fn by_distance(a: &NearbyStop, b: &NearbyStop) -> Ordering {
    a.distance_km
        .total_cmp(&b.distance_km)
        .then_with(|| a.stop.id.cmp(&b.stop.id))
}
