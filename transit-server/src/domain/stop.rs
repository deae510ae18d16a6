//! Stops.

use super::{Coordinate, StopId};

/// A boarding location from `stops.txt`.
///
/// Stops are reference data. A stop whose coordinates were missing or
/// unparsable in the feed is still loaded (its name is needed for trip
/// details) but has no `coordinate` and is invisible to spatial queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub coordinate: Option<Coordinate>,
}

impl Stop {
    /// Create a stop with a known position.
    pub fn new(id: StopId, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate: Some(coordinate),
        }
    }

    /// Create a stop whose position is unknown.
    pub fn unlocated(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate: None,
        }
    }
}
