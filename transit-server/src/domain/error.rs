//! Domain error types.
//!
//! These errors represent data inconsistencies caught while building domain
//! values. They are distinct from I/O errors in the data-access layer.

use super::TripId;

/// Domain-level errors for data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Two stop times of one trip share a sequence number
    #[error("trip {trip} has more than one stop time with sequence {sequence}")]
    DuplicateStopSequence { trip: TripId, sequence: u32 },

    /// A stop time was attached to the wrong trip
    #[error("stop time for trip {found} attached to trip {trip}")]
    ForeignStopTime { trip: TripId, found: TripId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::DuplicateStopSequence {
            trip: TripId::new("T1"),
            sequence: 4,
        };
        assert_eq!(
            err.to_string(),
            "trip T1 has more than one stop time with sequence 4"
        );

        let err = DomainError::ForeignStopTime {
            trip: TripId::new("T1"),
            found: TripId::new("T2"),
        };
        assert_eq!(err.to_string(), "stop time for trip T2 attached to trip T1");
    }
}
