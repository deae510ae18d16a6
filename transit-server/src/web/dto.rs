//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::departures::{ClosestDeparturesRequest, DepartureResult, ValidatedQuery};
use crate::domain::Coordinate;
use crate::trips::{TripCall, TripDetails};

/// Query string of the closest-departures endpoint.
///
/// Everything is taken as text so that malformed values reach validation
/// and produce a proper error body instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ClosestDeparturesParams {
    pub start_coordinates: Option<String>,
    pub end_coordinates: Option<String>,
    pub start_time: Option<String>,
    pub limit: Option<String>,
}

impl From<ClosestDeparturesParams> for ClosestDeparturesRequest {
    fn from(p: ClosestDeparturesParams) -> Self {
        Self {
            start_coordinates: p.start_coordinates,
            end_coordinates: p.end_coordinates,
            start_time: p.start_time,
            limit: p.limit,
        }
    }
}

/// Latitude/longitude pair.
#[derive(Debug, Serialize)]
pub struct CoordinatesDto {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Option<Coordinate>> for CoordinatesDto {
    /// Unknown positions render as 0.0, 0.0.
    fn from(c: Option<Coordinate>) -> Self {
        match c {
            Some(c) => Self {
                latitude: c.lat(),
                longitude: c.lon(),
            },
            None => Self {
                latitude: 0.0,
                longitude: 0.0,
            },
        }
    }
}

/// A stop call with stitched timestamps.
#[derive(Debug, Serialize)]
pub struct StopDto {
    pub name: String,
    pub coordinates: CoordinatesDto,
    pub arrival_time: String,
    pub departure_time: String,
}

/// One departure in a closest-departures response.
#[derive(Debug, Serialize)]
pub struct DepartureDto {
    pub trip_id: String,
    pub route_id: String,
    pub trip_headsign: String,
    pub stop: StopDto,
}

impl From<DepartureResult> for DepartureDto {
    fn from(d: DepartureResult) -> Self {
        Self {
            trip_id: d.trip_id.to_string(),
            route_id: d.route_id.to_string(),
            trip_headsign: d.headsign,
            stop: StopDto {
                name: d.stop_name,
                coordinates: Some(d.stop_coordinate).into(),
                arrival_time: d.arrival_timestamp,
                departure_time: d.departure_timestamp,
            },
        }
    }
}

/// Echo of the parameters a closest-departures query ran with.
#[derive(Debug, Serialize)]
pub struct DepartureQueryParameters {
    pub start_coordinates: String,
    pub end_coordinates: String,
    pub start_time: String,
    pub limit: usize,
}

impl From<&ValidatedQuery> for DepartureQueryParameters {
    fn from(q: &ValidatedQuery) -> Self {
        Self {
            start_coordinates: q.origin.to_string(),
            end_coordinates: q.destination.to_string(),
            start_time: q.start_time.to_string(),
            limit: q.limit,
        }
    }
}

/// Echo of a trip-details request.
#[derive(Debug, Serialize)]
pub struct TripQueryParameters {
    pub trip_id: String,
}

/// Response metadata.
#[derive(Debug, Serialize)]
pub struct Metadata<P> {
    #[serde(rename = "self")]
    pub self_link: String,
    pub city: String,
    pub query_parameters: P,
}

/// Response of the closest-departures endpoint.
#[derive(Debug, Serialize)]
pub struct ClosestDeparturesResponse {
    pub metadata: Metadata<DepartureQueryParameters>,
    pub departures: Vec<DepartureDto>,
}

/// Trip with its ordered calls.
#[derive(Debug, Serialize)]
pub struct TripDetailsDto {
    pub trip_id: String,
    pub route_id: String,
    pub trip_headsign: String,
    pub stops: Vec<StopDto>,
}

impl From<TripCall> for StopDto {
    fn from(c: TripCall) -> Self {
        Self {
            name: c.stop_name,
            coordinates: c.coordinate.into(),
            arrival_time: c.arrival_timestamp,
            departure_time: c.departure_timestamp,
        }
    }
}

impl From<TripDetails> for TripDetailsDto {
    fn from(t: TripDetails) -> Self {
        Self {
            trip_id: t.summary.trip_id.to_string(),
            route_id: t.summary.route_id.to_string(),
            trip_headsign: t.summary.headsign,
            stops: t.calls.into_iter().map(StopDto::from).collect(),
        }
    }
}

/// Response of the trip-details endpoint.
#[derive(Debug, Serialize)]
pub struct TripDetailsResponse {
    pub metadata: Metadata<TripQueryParameters>,
    pub trip_details: TripDetailsDto,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
