//! Domain types for the departures service.
//!
//! This module contains the validated value types shared by the data-access
//! layer and the query core. Types enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod coordinate;
mod error;
mod ids;
mod stop;
mod time;
mod trip;

pub use coordinate::{Coordinate, InvalidCoordinates};
pub use error::DomainError;
pub use ids::{RouteId, StopId, TripId};
pub use stop::Stop;
pub use time::{FALLBACK_START_TIME, GtfsTime, StartTime, TimeError};
pub use trip::{StopTime, Trip, TripSummary};
