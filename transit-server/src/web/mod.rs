//! Web layer for the transit API.
//!
//! Exposes closest-departures and trip-details endpoints for one city.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
