//! Reading a GTFS feed directory.
//!
//! Expects `stops.txt`, `trips.txt` and `stop_times.txt` in the directory.
//! Other feed files are not needed by the service and are ignored.

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::domain::{
    Coordinate, GtfsTime, RouteId, Stop, StopId, StopTime, TripId, TripSummary,
};

use super::dataset::Dataset;
use super::error::DataError;
use super::types::{FeedStop, FeedStopTime, FeedTrip};

const STOPS_FILE: &str = "stops.txt";
const TRIPS_FILE: &str = "trips.txt";
const STOP_TIMES_FILE: &str = "stop_times.txt";

/// Load and index a feed directory.
pub fn load_feed(dir: impl AsRef<Path>) -> Result<Dataset, DataError> {
    let dir = dir.as_ref();
    info!(dir = %dir.display(), "loading GTFS feed");

    let stops = read_records::<FeedStop>(dir, STOPS_FILE)?
        .into_iter()
        .map(|(_, raw)| convert_stop(raw))
        .collect::<Vec<_>>();

    let trips = read_records::<FeedTrip>(dir, TRIPS_FILE)?
        .into_iter()
        .map(|(_, raw)| convert_trip(raw))
        .collect::<Vec<_>>();

    let mut stop_times = Vec::new();
    let mut untimed = 0usize;
    for (line, raw) in read_records::<FeedStopTime>(dir, STOP_TIMES_FILE)? {
        match convert_stop_time(raw, line)? {
            Some(st) => stop_times.push(st),
            None => untimed += 1,
        }
    }
    if untimed > 0 {
        warn!(count = untimed, "skipped stop times without any time");
    }

    let dataset = Dataset::build(stops, trips, stop_times)?;
    let stats = dataset.stats();
    info!(
        stops = stats.stops,
        trips = stats.trips,
        stop_times = stats.stop_times,
        "GTFS feed loaded"
    );

    Ok(dataset)
}

/// Deserialize every record of a feed file, paired with its line number.
fn read_records<T: DeserializeOwned>(
    dir: &Path,
    file: &'static str,
) -> Result<Vec<(u64, T)>, DataError> {
    let path = dir.join(file);
    let handle = File::open(&path).map_err(|source| DataError::Io {
        path: path.clone(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(handle);

    let headers = reader
        .headers()
        .map_err(|source| DataError::Csv { file, source })?
        .clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| DataError::Csv { file, source })?;
        let line = record.position().map_or(0, |p| p.line());
        let value = record
            .deserialize(Some(&headers))
            .map_err(|source| DataError::Csv { file, source })?;
        records.push((line, value));
    }

    Ok(records)
}

fn convert_stop(raw: FeedStop) -> Stop {
    let id = StopId::new(raw.stop_id);
    match Coordinate::from_fields(&raw.stop_lat, &raw.stop_lon) {
        Some(coordinate) => Stop::new(id, raw.stop_name, coordinate),
        None => {
            warn!(
                stop_id = %id,
                lat = %raw.stop_lat,
                lon = %raw.stop_lon,
                "stop has no usable coordinates"
            );
            Stop::unlocated(id, raw.stop_name)
        }
    }
}

fn convert_trip(raw: FeedTrip) -> TripSummary {
    TripSummary {
        trip_id: TripId::new(raw.trip_id),
        route_id: RouteId::new(raw.route_id),
        headsign: raw.trip_headsign,
    }
}

/// Convert a stop-time row.
///
/// GTFS lets non-timepoint rows leave one or both times blank. A single
/// blank time is filled from the other; rows with neither are skipped.
fn convert_stop_time(raw: FeedStopTime, line: u64) -> Result<Option<StopTime>, DataError> {
    let invalid = |reason: String| DataError::InvalidRecord {
        file: STOP_TIMES_FILE,
        line,
        reason,
    };

    let stop_sequence: u32 = raw
        .stop_sequence
        .parse()
        .map_err(|_| invalid(format!("stop_sequence {:?} is not a number", raw.stop_sequence)))?;

    let parse = |field: &str, value: &str| -> Result<Option<GtfsTime>, DataError> {
        if value.is_empty() {
            return Ok(None);
        }
        GtfsTime::parse(value)
            .map(Some)
            .map_err(|e| invalid(format!("{field} {value:?}: {e}")))
    };

    let arrival = parse("arrival_time", &raw.arrival_time)?;
    let departure = parse("departure_time", &raw.departure_time)?;

    let (arrival_time, departure_time) = match (arrival, departure) {
        (Some(a), Some(d)) => (a, d),
        (Some(a), None) => (a, a),
        (None, Some(d)) => (d, d),
        (None, None) => return Ok(None),
    };

    Ok(Some(StopTime {
        trip_id: TripId::new(raw.trip_id),
        stop_id: StopId::new(raw.stop_id),
        stop_sequence,
        arrival_time,
        departure_time,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const STOPS: &str = "\
stop_id,stop_code,stop_name,stop_lat,stop_lon
1,101,Rynek,51.1100,17.0320
2,102,Plac Dominikański,51.1083,17.0395
3,103,Dworzec Główny,51.0983,17.0367
4,104,Zajezdnia,,
";

    const TRIPS: &str = "\
route_id,service_id,trip_id,trip_headsign,direction_id
A,6,3_100,Dworzec Główny,0
A,6,3_200,Rynek,1
";

    const STOP_TIMES: &str = "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence,pickup_type,drop_off_type
3_100,08:00:00,08:00:00,1,1,0,0
3_100,08:03:00,08:04:00,2,2,0,0
3_100,08:10:00,08:10:00,3,3,0,0
3_200,24:50:00,24:50:00,3,1,0,0
3_200,,,2,2,0,0
3_200,25:05:00,,1,3,0,0
";

    fn write_feed(stops: &str, trips: &str, stop_times: &str) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(STOPS_FILE), stops).unwrap();
        fs::write(dir.path().join(TRIPS_FILE), trips).unwrap();
        fs::write(dir.path().join(STOP_TIMES_FILE), stop_times).unwrap();
        dir
    }

    #[test]
    fn loads_feed() {
        let dir = write_feed(STOPS, TRIPS, STOP_TIMES);
        let ds = load_feed(dir.path()).unwrap();

        let stats = ds.stats();
        assert_eq!(stats.stops, 4);
        assert_eq!(stats.unlocated_stops, 1);
        assert_eq!(stats.trips, 2);
        // The row with neither time is skipped
        assert_eq!(stats.stop_times, 5);

        let trip = ds.trip(&TripId::new("3_100")).unwrap();
        assert_eq!(trip.summary().headsign, "Dworzec Główny");
        assert_eq!(trip.summary().route_id.as_str(), "A");
        assert_eq!(trip.stop_times()[1].departure_time.as_str(), "08:04:00");
    }

    #[test]
    fn blank_departure_filled_from_arrival() {
        let dir = write_feed(STOPS, TRIPS, STOP_TIMES);
        let ds = load_feed(dir.path()).unwrap();

        let trip = ds.trip(&TripId::new("3_200")).unwrap();
        let last = trip.terminal().unwrap();
        assert_eq!(last.stop_id.as_str(), "1");
        assert_eq!(last.departure_time.as_str(), "25:05:00");
    }

    #[test]
    fn unlocated_stop_kept_by_id() {
        let dir = write_feed(STOPS, TRIPS, STOP_TIMES);
        let ds = load_feed(dir.path()).unwrap();

        let stop = ds.stop(&StopId::new("4")).unwrap();
        assert_eq!(stop.name, "Zajezdnia");
        assert!(stop.coordinate.is_none());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_feed(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn bad_time_reports_line() {
        let stop_times = "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
3_100,08:00:00,08:00:00,1,1
3_100,08:03:00,8h04,2,2
";
        let dir = write_feed(STOPS, TRIPS, stop_times);
        let err = load_feed(dir.path()).unwrap_err();

        match err {
            DataError::InvalidRecord { file, line, .. } => {
                assert_eq!(file, STOP_TIMES_FILE);
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_sequence_is_rejected() {
        let stop_times = "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
3_100,08:00:00,08:00:00,1,first
";
        let dir = write_feed(STOPS, TRIPS, stop_times);
        assert!(matches!(
            load_feed(dir.path()),
            Err(DataError::InvalidRecord { line: 2, .. })
        ));
    }

    #[test]
    fn ragged_csv_is_rejected() {
        let stops = "\
stop_id,stop_name,stop_lat,stop_lon
1,Rynek,51.11
";
        let dir = write_feed(stops, TRIPS, STOP_TIMES);
        assert!(matches!(
            load_feed(dir.path()),
            Err(DataError::Csv { file: "stops.txt", .. })
        ));
    }
}
