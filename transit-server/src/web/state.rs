//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use crate::departures::QueryConfig;
use crate::gtfs::GtfsStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Loaded schedule
    pub store: Arc<GtfsStore>,

    /// Closest-departures tuning
    pub config: Arc<QueryConfig>,

    /// The supported city, matched case-sensitively against the path
    pub city: Arc<str>,

    /// Deadline for dataset reads within one request
    pub timeout: Duration,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: GtfsStore, config: QueryConfig, city: &str, timeout: Duration) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            city: Arc::from(city),
            timeout,
        }
    }
}
