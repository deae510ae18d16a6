//! The closest-departures query.
//!
//! Answers "which vehicles can I board near here that head toward there?"
//! The query runs as a fixed sequence of stages (see [`QueryStage`]):
//! validate the input, find stops near the origin, fetch their upcoming
//! departures, keep trips heading toward the destination, then rank and
//! truncate. Empty intermediate results short-circuit to an empty success.

use thiserror::Error;

use crate::domain::{
    Coordinate, GtfsTime, InvalidCoordinates, RouteId, StartTime, StopId, TimeError, TripId,
};
use crate::gtfs::DataError;

use super::catalog::StopCatalog;
use super::config::QueryConfig;
use super::data::DataSource;
use super::direction::DirectionFilter;
use super::observer::{QueryObserver, QueryStage};
use super::rank::{DepartureCandidate, rank_departures};
use super::source::{DepartureSource, StopDepartures};

/// Error from a closest-departures query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Origin or destination was not supplied
    #[error("missing required parameter: {0}")]
    MissingRequiredParameter(&'static str),

    /// A coordinate parameter could not be parsed
    #[error("{field}: {source}")]
    InvalidCoordinates {
        field: &'static str,
        #[source]
        source: InvalidCoordinates,
    },

    /// Limit was not a non-negative integer
    #[error("invalid limit '{0}': expected a non-negative integer")]
    InvalidLimit(String),

    /// Start time did not contain a usable time of day
    #[error("start_time: {0}")]
    InvalidStartTime(#[from] TimeError),

    /// The dataset could not be read
    #[error("data access failed: {0}")]
    DataAccess(#[from] DataError),
}

impl QueryError {
    /// Whether the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::DataAccess(_))
    }
}

/// Raw query parameters as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct ClosestDeparturesRequest {
    pub start_coordinates: Option<String>,
    pub end_coordinates: Option<String>,
    pub start_time: Option<String>,
    pub limit: Option<String>,
}

impl ClosestDeparturesRequest {
    /// Parse and check the parameters. Never touches the dataset.
    ///
    /// Blank parameters count as absent. A missing start time or limit falls
    /// back to the configured default.
    pub fn validate(&self, config: &QueryConfig) -> Result<ValidatedQuery, QueryError> {
        let origin =
            required_coordinate("start_coordinates", self.start_coordinates.as_deref())?;
        let destination = required_coordinate("end_coordinates", self.end_coordinates.as_deref())?;

        let start_time = match present(self.start_time.as_deref()) {
            Some(raw) => StartTime::parse(raw)?,
            None => StartTime::parse(&config.fallback_start_time)?,
        };

        let limit = match present(self.limit.as_deref()) {
            Some(raw) => parse_limit(raw)?,
            None => config.default_limit,
        };

        Ok(ValidatedQuery {
            origin,
            destination,
            start_time,
            limit,
        })
    }
}

/// Plain decimal digits only; signs are rejected.
fn parse_limit(raw: &str) -> Result<usize, QueryError> {
    let invalid = || QueryError::InvalidLimit(raw.to_string());
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse().map_err(|_| invalid())
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_coordinate(field: &'static str, value: Option<&str>) -> Result<Coordinate, QueryError> {
    let raw = present(value).ok_or(QueryError::MissingRequiredParameter(field))?;
    Coordinate::parse(raw).map_err(|source| QueryError::InvalidCoordinates { field, source })
}

/// A query whose parameters have been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub start_time: StartTime,
    pub limit: usize,
}

/// One departure the rider could take.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureResult {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub headsign: String,
    pub stop_name: String,
    pub stop_coordinate: Coordinate,
    /// Distance from the origin to the boarding stop (km).
    pub distance_km: f64,
    /// Stop-time stitched onto the query date; hours may exceed 23.
    pub arrival_timestamp: String,
    pub departure_timestamp: String,
}

/// Result of a closest-departures query.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// The query as run, with defaults filled in.
    pub query: ValidatedQuery,

    /// Departures, closest stop first then earliest.
    pub departures: Vec<DepartureResult>,
}

/// Runs closest-departures queries against a data source.
pub struct DepartureFinder<'a, S: DataSource> {
    source: &'a S,
    config: &'a QueryConfig,
    observer: &'a dyn QueryObserver,
}

impl<'a, S: DataSource> DepartureFinder<'a, S> {
    /// Create a new finder.
    pub fn new(source: &'a S, config: &'a QueryConfig, observer: &'a dyn QueryObserver) -> Self {
        Self {
            source,
            config,
            observer,
        }
    }

    /// Validate raw parameters and run the query.
    ///
    /// Invalid input is rejected before any read handle is opened.
    pub fn handle(&self, request: &ClosestDeparturesRequest) -> Result<QueryOutcome, QueryError> {
        self.observer.stage(QueryStage::ValidateInput);
        let query = request
            .validate(self.config)
            .inspect_err(|e| self.observer.rejected(e))?;

        let departures = self
            .find(&query)
            .inspect_err(|e| self.observer.rejected(e))?;
        Ok(QueryOutcome { query, departures })
    }

    /// Run an already validated query.
    ///
    /// Opens one read handle, which is dropped on every return path.
    pub fn find(&self, query: &ValidatedQuery) -> Result<Vec<DepartureResult>, QueryError> {
        let reader = self.source.open()?;
        self.run(&reader, query)
    }

    fn run(
        &self,
        reader: &S::Reader,
        query: &ValidatedQuery,
    ) -> Result<Vec<DepartureResult>, QueryError> {
        self.observer.stage(QueryStage::LocateCandidateStops);
        let radius_km = self.config.search_radius_km;
        let stops = StopCatalog::new(reader).nearby_stops(query.origin, radius_km)?;
        self.observer.candidate_stops(stops.len());
        if stops.is_empty() {
            return Ok(self.build(query, Vec::new(), 0));
        }

        self.observer.stage(QueryStage::FetchDepartures);
        let source = DepartureSource::new(reader);
        let mut filter = DirectionFilter::new(reader, query.origin, query.destination);
        let cutoff = query.start_time.cutoff();
        let mut fetched = Vec::new();
        for stop in &stops {
            let id = &stop.stop.id;
            let found = self.fetch_stop(&source, &mut filter, id, cutoff, query.limit)?;
            self.observer.departures_fetched(id, found.departures.len(), found.truncated);
            fetched.extend(
                found
                    .departures
                    .into_iter()
                    .map(|departure| DepartureCandidate { stop, departure }),
            );
        }
        if fetched.is_empty() {
            return Ok(self.build(query, Vec::new(), 0));
        }

        self.observer.stage(QueryStage::FilterByDirection);
        let considered = fetched.len();
        let candidates = self.filter_by_direction(&mut filter, fetched)?;

        self.observer.stage(QueryStage::RankAndLimit);
        let ranked = rank_departures(candidates, query.limit);

        Ok(self.build(query, ranked, considered))
    }

    /// Upcoming departures from one stop.
    ///
    /// Only the earliest `limit` departures heading the right way can make
    /// the final result, since every departure from the stop shares its
    /// distance. When the row cap cuts the read short before that many are
    /// found, the stop is read again with twice the cap.
    fn fetch_stop(
        &self,
        source: &DepartureSource<'_, S::Reader>,
        filter: &mut DirectionFilter<'_, S::Reader>,
        stop: &StopId,
        cutoff: GtfsTime,
        limit: usize,
    ) -> Result<StopDepartures, DataError> {
        let mut max_rows = self.config.max_departures_per_stop.max(limit).max(1);
        loop {
            let found = source.upcoming_departures(stop, cutoff, max_rows)?;
            if !found.truncated {
                return Ok(found);
            }

            let mut heading = 0;
            for departure in &found.departures {
                if self.check_direction(filter, &departure.trip.trip_id)? {
                    heading += 1;
                }
            }
            if heading >= limit {
                return Ok(found);
            }
            max_rows = max_rows.saturating_mul(2);
        }
    }

    fn filter_by_direction<'s>(
        &self,
        filter: &mut DirectionFilter<'_, S::Reader>,
        fetched: Vec<DepartureCandidate<'s>>,
    ) -> Result<Vec<DepartureCandidate<'s>>, DataError> {
        let mut kept = Vec::with_capacity(fetched.len());
        for candidate in fetched {
            if self.check_direction(filter, &candidate.departure.trip.trip_id)? {
                kept.push(candidate);
            }
        }
        Ok(kept)
    }

    /// Direction verdict for a trip, reported the first time it is computed.
    fn check_direction(
        &self,
        filter: &mut DirectionFilter<'_, S::Reader>,
        trip: &TripId,
    ) -> Result<bool, DataError> {
        let known = filter.checked();
        let heading = filter.is_heading_toward(trip)?;
        if filter.checked() > known {
            self.observer.direction_verdict(trip, heading);
        }
        Ok(heading)
    }

    fn build(
        &self,
        query: &ValidatedQuery,
        ranked: Vec<DepartureCandidate<'_>>,
        considered: usize,
    ) -> Vec<DepartureResult> {
        self.observer.stage(QueryStage::BuildResult);

        let results: Vec<DepartureResult> = ranked
            .into_iter()
            .map(|DepartureCandidate { stop, departure }| DepartureResult {
                trip_id: departure.trip.trip_id,
                route_id: departure.trip.route_id,
                headsign: departure.trip.headsign,
                stop_name: stop.stop.name.clone(),
                stop_coordinate: stop.coordinate,
                distance_km: stop.distance_km,
                arrival_timestamp: query.start_time.stitch(departure.stop_time.arrival_time),
                departure_timestamp: query.start_time.stitch(departure.stop_time.departure_time),
            })
            .collect();

        self.observer.finished(results.len(), considered);
        results
    }
}

/// Run one closest-departures query with already parsed inputs.
///
/// `start_time` is an ISO-8601 style timestamp; only its date and
/// time-of-day are used.
pub fn closest_departures<S: DataSource>(
    source: &S,
    config: &QueryConfig,
    observer: &dyn QueryObserver,
    origin: Coordinate,
    destination: Coordinate,
    start_time: &str,
    limit: usize,
) -> Result<Vec<DepartureResult>, QueryError> {
    let query = ValidatedQuery {
        origin,
        destination,
        start_time: StartTime::parse(start_time)?,
        limit,
    };
    DepartureFinder::new(source, config, observer).find(&query)
}
