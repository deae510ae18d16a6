//! Raw GTFS records as they appear in the feed files.
//!
//! Only the columns the service uses are declared; any others are ignored.
//! Every field is read as text and validated during conversion so that a
//! bad value can be reported with its file and line.

use serde::Deserialize;

/// A row of `stops.txt`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: String,
    pub stop_lon: String,
}

/// A row of `trips.txt`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedTrip {
    pub route_id: String,
    pub trip_id: String,
    pub trip_headsign: String,
}

/// A row of `stop_times.txt`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedStopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: String,
}
