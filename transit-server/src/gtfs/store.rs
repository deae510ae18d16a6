//! Shared dataset store and per-query readers.

use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use crate::departures::{DataSource, TransitData};
use crate::domain::{GtfsTime, Stop, StopId, StopTime, Trip, TripId, TripSummary};
use crate::geo::BoundingBox;

use super::dataset::Dataset;
use super::error::DataError;
use super::loader::load_feed;

/// Holds the loaded schedule and hands out read handles.
///
/// The snapshot is immutable, so any number of readers may use it at once.
#[derive(Debug)]
pub struct GtfsStore {
    snapshot: Arc<Dataset>,
}

impl GtfsStore {
    /// Wrap an already-built dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            snapshot: Arc::new(dataset),
        }
    }

    /// Load a feed directory into a new store.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        Ok(Self::new(load_feed(dir)?))
    }

    /// Open a read handle on the current snapshot.
    pub fn reader(&self) -> DatasetReader {
        trace!("opened dataset reader");
        DatasetReader {
            dataset: Arc::clone(&self.snapshot),
        }
    }
}

impl DataSource for GtfsStore {
    type Reader = DatasetReader;

    fn open(&self) -> Result<DatasetReader, DataError> {
        Ok(self.reader())
    }
}

/// A read handle on one dataset snapshot.
#[derive(Debug)]
pub struct DatasetReader {
    dataset: Arc<Dataset>,
}

impl DatasetReader {
    /// Direct access to the snapshot.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl Drop for DatasetReader {
    fn drop(&mut self) {
        trace!("released dataset reader");
    }
}

impl TransitData for DatasetReader {
    fn stops_in_box(&self, bbox: &BoundingBox) -> Result<Vec<Stop>, DataError> {
        Ok(self.dataset.stops_in_box(bbox).cloned().collect())
    }

    fn departures_at(
        &self,
        stop: &StopId,
        cutoff: GtfsTime,
        max_rows: usize,
    ) -> Result<Vec<(TripSummary, StopTime)>, DataError> {
        Ok(self
            .dataset
            .departures_from(stop, cutoff, max_rows)
            .map(|(trip, st)| (trip.summary().clone(), st.clone()))
            .collect())
    }

    fn stop(&self, id: &StopId) -> Result<Option<Stop>, DataError> {
        Ok(self.dataset.stop(id).cloned())
    }

    fn terminal_stop(&self, trip: &TripId) -> Result<Option<Stop>, DataError> {
        Ok(self.dataset.terminal_stop(trip).cloned())
    }

    fn trip(&self, trip: &TripId) -> Result<Option<Trip>, DataError> {
        Ok(self.dataset.trip(trip).cloned())
    }
}
