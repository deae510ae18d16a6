//! Dataset identifiers.
//!
//! GTFS identifiers are opaque strings that are stable within a feed. They
//! carry no structure, so the only thing these newtypes add is keeping stop
//! and trip identifiers from being mixed up.

use std::borrow::Borrow;
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identifier of a stop (`stops.stop_id`).
    StopId
);

opaque_id!(
    /// Identifier of a trip (`trips.trip_id`).
    TripId
);

opaque_id!(
    /// Identifier of a route (`trips.route_id`).
    RouteId
);
