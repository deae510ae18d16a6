//! Closest-departures query core.
//!
//! Given an origin, a destination and a start time, finds departures from
//! stops near the origin on trips heading toward the destination. The core
//! reads the schedule only through [`TransitData`], so it runs unchanged
//! against the GTFS store or an in-memory fixture.

mod catalog;
mod config;
mod data;
mod direction;
mod observer;
mod query;
mod rank;
mod source;


pub use catalog::{NearbyStop, StopCatalog};
pub use config::QueryConfig;
pub use data::{DataSource, TransitData};
pub use direction::{DirectionFilter, heading_toward};
pub use observer::{NoopObserver, QueryObserver, QueryStage, TracingObserver};
pub use query::{
    ClosestDeparturesRequest, DepartureFinder, DepartureResult, QueryError, QueryOutcome,
    ValidatedQuery, closest_departures,
};
pub use rank::{DepartureCandidate, rank_departures};
pub use source::{Departure, DepartureSource, StopDepartures};
