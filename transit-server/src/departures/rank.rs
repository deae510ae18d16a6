//! Departure ranking.
//!
//! Closest stop first, then earliest departure. Stop and trip ids break any
//! remaining ties so the output is fully deterministic.

use std::cmp::Ordering;

use super::catalog::NearbyStop;
use super::source::Departure;

/// A direction-approved departure from a nearby stop.
#[derive(Debug, Clone)]
pub struct DepartureCandidate<'a> {
    pub stop: &'a NearbyStop,
    pub departure: Departure,
}

/// Sort candidates best-first and keep at most `limit`.
pub fn rank_departures(
    mut candidates: Vec<DepartureCandidate<'_>>,
    limit: usize,
) -> Vec<DepartureCandidate<'_>> {
    candidates.sort_by(compare);
    candidates.truncate(limit);
    candidates
}

fn compare(a: &DepartureCandidate<'_>, b: &DepartureCandidate<'_>) -> Ordering {
    // Primary: walking distance to the stop
    let dist_cmp = a.stop.distance_km.total_cmp(&b.stop.distance_km);
    if dist_cmp != Ordering::Equal {
        return dist_cmp;
    }

    // Secondary: earliest departure
    let dep_cmp = a
        .departure
        .stop_time
        .departure_time
        .cmp(&b.departure.stop_time.departure_time);
    if dep_cmp != Ordering::Equal {
        return dep_cmp;
    }

    a.stop
        .stop
        .id
        .cmp(&b.stop.stop.id)
        .then_with(|| a.departure.trip.trip_id.cmp(&b.departure.trip.trip_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Coordinate, GtfsTime, RouteId, Stop, StopId, StopTime, TripId, TripSummary,
    };

    fn nearby(id: &str, distance_km: f64) -> NearbyStop {
        let coordinate = Coordinate::new(51.1, 17.03).unwrap();
        NearbyStop {
            stop: Stop::new(StopId::new(id), id, coordinate),
            coordinate,
            distance_km,
        }
    }

    fn candidate<'a>(stop: &'a NearbyStop, trip: &str, time: &str) -> DepartureCandidate<'a> {
        let t = GtfsTime::parse(time).unwrap();
        let departure = Departure {
            trip: TripSummary {
                trip_id: TripId::new(trip),
                route_id: RouteId::new("R"),
                headsign: String::new(),
            },
            stop_time: StopTime {
                trip_id: TripId::new(trip),
                stop_id: stop.stop.id.clone(),
                stop_sequence: 1,
                arrival_time: t,
                departure_time: t,
            },
        };
        DepartureCandidate { stop, departure }
    }

    fn ids(ranked: &[DepartureCandidate<'_>]) -> Vec<String> {
        ranked
            .iter()
            .map(|c| format!("{}/{}", c.stop.stop.id, c.departure.trip.trip_id))
            .collect()
    }

    #[test]
    fn closer_stop_beats_earlier_departure() {
        let near = nearby("near", 0.1);
        let far = nearby("far", 0.5);
        let candidates = vec![
            candidate(&far, "T1", "08:01:00"),
            candidate(&near, "T2", "08:30:00"),
        ];

        let ranked = rank_departures(candidates, 5);
        assert_eq!(ids(&ranked), vec!["near/T2", "far/T1"]);
    }

    #[test]
    fn same_stop_sorted_by_departure() {
        let stop = nearby("s", 0.2);
        let candidates = vec![
            candidate(&stop, "late", "25:05:00"),
            candidate(&stop, "early", "08:00:00"),
            candidate(&stop, "mid", "12:00:00"),
        ];

        let ranked = rank_departures(candidates, 10);
        assert_eq!(ids(&ranked), vec!["s/early", "s/mid", "s/late"]);
    }

    #[test]
    fn ties_broken_by_ids() {
        let a = nearby("a", 0.3);
        let b = nearby("b", 0.3);
        let candidates = vec![
            candidate(&b, "T1", "08:00:00"),
            candidate(&a, "T9", "08:00:00"),
            candidate(&a, "T2", "08:00:00"),
        ];

        let ranked = rank_departures(candidates, 10);
        assert_eq!(ids(&ranked), vec!["a/T2", "a/T9", "b/T1"]);
    }

    #[test]
    fn truncates_to_limit() {
        let stop = nearby("s", 0.2);
        let candidates: Vec<_> = (0..10)
            .map(|i| candidate(&stop, &format!("T{i}"), &format!("08:{i:02}:00")))
            .collect();

        assert_eq!(rank_departures(candidates.clone(), 3).len(), 3);
        assert!(rank_departures(candidates, 0).is_empty());
    }
}
