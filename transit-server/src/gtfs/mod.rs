//! GTFS schedule data access.
//!
//! This module loads a static GTFS feed (`stops.txt`, `trips.txt`,
//! `stop_times.txt`) into an immutable in-memory snapshot and serves
//! read-only queries against it.
//!
//! Key characteristics of the data:
//! - Times are "HH:MM:SS" strings with no date, and hours may exceed 23
//! - Trip order is given by `stop_sequence`, not by row order
//! - Stops may lack coordinates; they are kept but never match spatially

mod dataset;
mod error;
mod loader;
mod store;
mod types;

pub use dataset::{Dataset, DatasetStats};
pub use error::DataError;
pub use loader::load_feed;
pub use store::{DatasetReader, GtfsStore};
pub use types::{FeedStop, FeedStopTime, FeedTrip};
