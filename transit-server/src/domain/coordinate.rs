//! Geographic coordinates.

use std::fmt;

/// Error returned when a coordinate string or value is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinates: {reason}")]
pub struct InvalidCoordinates {
    reason: &'static str,
}

impl InvalidCoordinates {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A WGS84 position in decimal degrees.
///
/// Latitude is always within `[-90, 90]` and longitude within `[-180, 180]`.
/// Both components are finite.
///
/// # Examples
///
/// ```
/// use transit_server::domain::Coordinate;
///
/// let rynek = Coordinate::parse("51.1100, 17.0320").unwrap();
/// assert_eq!(rynek.lat(), 51.11);
/// assert_eq!(rynek.lon(), 17.032);
///
/// assert!(Coordinate::parse("abc").is_err());
/// assert!(Coordinate::parse("91.0,17.0").is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, validating ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinates> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinates::new("components must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinates::new("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinates::new(
                "longitude must be within [-180, 180]",
            ));
        }
        Ok(Self { lat, lon })
    }

    /// Parse a `lat,lon` pair. Whitespace around each component is ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidCoordinates> {
        let mut parts = s.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(InvalidCoordinates::new("expected 'lat,lon'"));
        };

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| InvalidCoordinates::new("latitude is not a number"))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| InvalidCoordinates::new("longitude is not a number"))?;

        Self::new(lat, lon)
    }

    /// Parse a pair of raw dataset fields, as found in `stops.txt`.
    ///
    /// Returns `None` for blank, non-numeric or out-of-range values; such
    /// stops are kept in the dataset but never match a spatial query.
    pub fn from_fields(lat: &str, lon: &str) -> Option<Self> {
        let lat = lat.trim().parse().ok()?;
        let lon = lon.trim().parse().ok()?;
        Self::new(lat, lon).ok()
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}
