//! Configuration for the closest-departures query.

use crate::domain::FALLBACK_START_TIME;

/// Tuning parameters for closest-departures queries.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Radius around the origin in which to look for boarding stops (km).
    pub search_radius_km: f64,

    /// Departures read per candidate stop in one go.
    ///
    /// Bounds the cost of one query. The cap applies before direction
    /// filtering, so when it leaves fewer than `limit` departures heading
    /// toward the destination the stop is read again with twice the cap.
    pub max_departures_per_stop: usize,

    /// Number of results returned when the caller gives no limit.
    pub default_limit: usize,

    /// Start timestamp used when the caller gives none.
    pub fallback_start_time: String,
}

impl QueryConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        search_radius_km: f64,
        max_departures_per_stop: usize,
        default_limit: usize,
        fallback_start_time: impl Into<String>,
    ) -> Self {
        Self {
            search_radius_km,
            max_departures_per_stop,
            default_limit,
            fallback_start_time: fallback_start_time.into(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search_radius_km: 1.0,
            max_departures_per_stop: 10_000,
            default_limit: 5,
            fallback_start_time: FALLBACK_START_TIME.to_string(),
        }
    }
}
