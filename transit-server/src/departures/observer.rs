//! Hooks for watching a query run.
//!
//! The orchestrator reports each stage it enters and a few counts along the
//! way. Production uses [`TracingObserver`]; tests can record the calls.

use std::fmt;

use tracing::debug;

use crate::domain::{StopId, TripId};

use super::query::QueryError;

/// The stages of a closest-departures query, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    ValidateInput,
    LocateCandidateStops,
    FetchDepartures,
    FilterByDirection,
    RankAndLimit,
    BuildResult,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ValidateInput => "validate-input",
            Self::LocateCandidateStops => "locate-candidate-stops",
            Self::FetchDepartures => "fetch-departures",
            Self::FilterByDirection => "filter-by-direction",
            Self::RankAndLimit => "rank-and-limit",
            Self::BuildResult => "build-result",
        };
        f.write_str(name)
    }
}

/// Receives progress reports from a running query.
///
/// Every method has an empty default.
pub trait QueryObserver {
    fn stage(&self, _stage: QueryStage) {}

    fn candidate_stops(&self, _count: usize) {}

    /// Departures fetched for one stop. `truncated` means reading stopped
    /// at the row cap because enough departures already head the right way.
    fn departures_fetched(&self, _stop: &StopId, _count: usize, _truncated: bool) {}

    fn direction_verdict(&self, _trip: &TripId, _heading_toward: bool) {}

    fn finished(&self, _returned: usize, _considered: usize) {}

    fn rejected(&self, _error: &QueryError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl QueryObserver for NoopObserver {}

/// Observer that logs through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn stage(&self, stage: QueryStage) {
        debug!(%stage, "query stage");
    }

    fn candidate_stops(&self, count: usize) {
        debug!(count, "candidate stops located");
    }

    fn departures_fetched(&self, stop: &StopId, count: usize, truncated: bool) {
        debug!(%stop, count, truncated, "departures fetched");
    }

    fn direction_verdict(&self, trip: &TripId, heading_toward: bool) {
        debug!(%trip, heading_toward, "direction checked");
    }

    fn finished(&self, returned: usize, considered: usize) {
        debug!(returned, considered, "query finished");
    }

    fn rejected(&self, error: &QueryError) {
        debug!(%error, "query rejected");
    }
}
