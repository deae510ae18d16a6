//! Great-circle distances and bounding boxes.
//!
//! Distances use the haversine formula on a spherical Earth. Bounding boxes
//! are a cheap prefilter for spatial queries; they are always at least as
//! large as the circle they stand in for, so filtering by box and then by
//! exact distance never loses a match.

use crate::domain::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Degrees of latitude per kilometre, rounded up.
///
/// One degree of latitude is about 111.19 km on a 6371 km sphere, so a
/// kilometre is about 0.008993 degrees. Rounding up keeps the box slightly
/// larger than the circle.
pub const DEGREES_LAT_PER_KM: f64 = 0.009;

/// Great-circle distance between two coordinates in kilometres.
///
/// Exactly symmetric in its arguments, zero for identical points, and
/// stable for antipodal points.
///
/// # Examples
///
/// ```
/// use transit_server::domain::Coordinate;
/// use transit_server::geo::distance_km;
///
/// let a = Coordinate::new(51.1000, 17.0300).unwrap();
/// let b = Coordinate::new(51.1000, 17.0270).unwrap();
/// let d = distance_km(a, b);
/// assert!((d - 0.2095).abs() < 0.001);
/// assert_eq!(d, distance_km(b, a));
/// assert_eq!(distance_km(a, a), 0.0);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    // Fix the evaluation order so that swapping arguments cannot change the
    // floating-point result.
    let (a, b) = if (a.lat(), a.lon()) <= (b.lat(), b.lon()) {
        (a, b)
    } else {
        (b, a)
    };

    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// An axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// The whole globe.
    pub const WORLD: BoundingBox = BoundingBox {
        min_lat: -90.0,
        max_lat: 90.0,
        min_lon: -180.0,
        max_lon: 180.0,
    };

    /// Smallest box guaranteed to contain every point within `radius_km`
    /// of `center`.
    ///
    /// The latitude half-width is `radius_km * 0.009` degrees. The
    /// longitude half-width is derived from the same angular radius at the
    /// centre's latitude, so it widens towards the poles. If the circle
    /// reaches a pole or crosses the antimeridian the box spans every
    /// longitude.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::Coordinate;
    /// use transit_server::geo::BoundingBox;
    ///
    /// let center = Coordinate::new(51.1, 17.03).unwrap();
    /// let bbox = BoundingBox::around(center, 1.0);
    /// assert!((bbox.max_lat - bbox.min_lat - 0.018).abs() < 1e-9);
    /// // A kilometre spans more longitude than latitude away from the equator
    /// assert!(bbox.max_lon - bbox.min_lon > 0.028);
    /// ```
    pub fn around(center: Coordinate, radius_km: f64) -> Self {
        let radius_km = radius_km.max(0.0);
        let d_lat = radius_km * DEGREES_LAT_PER_KM;

        let min_lat = center.lat() - d_lat;
        let max_lat = center.lat() + d_lat;

        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self {
                min_lat: min_lat.max(-90.0),
                max_lat: max_lat.min(90.0),
                min_lon: -180.0,
                max_lon: 180.0,
            };
        }

        // Widest longitude offset of any point at angular distance `angle`
        // from the centre.
        let angle = d_lat.to_radians();
        let ratio = angle.sin() / center.lat().to_radians().cos();
        if !(0.0..1.0).contains(&ratio) {
            return Self {
                min_lat,
                max_lat,
                min_lon: -180.0,
                max_lon: 180.0,
            };
        }
        let d_lon = ratio.asin().to_degrees();

        let min_lon = center.lon() - d_lon;
        let max_lon = center.lon() + d_lon;
        if min_lon < -180.0 || max_lon > 180.0 {
            return Self {
                min_lat,
                max_lat,
                min_lon: -180.0,
                max_lon: 180.0,
            };
        }

        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Whether a coordinate lies inside the box, edges included.
    pub fn contains(&self, c: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&c.lat())
            && (self.min_lon..=self.max_lon).contains(&c.lon())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0)
            .prop_map(|(lat, lon)| Coordinate::new(lat, lon).unwrap())
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
            prop_assert_eq!(distance_km(a, b), distance_km(b, a));
        }

        #[test]
        fn distance_to_self_is_zero(a in coordinate()) {
            prop_assert!(distance_km(a, a).abs() < 1e-9);
        }

        #[test]
        fn distance_is_bounded(a in coordinate(), b in coordinate()) {
            let d = distance_km(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }

        /// Every point inside the radius is inside the box
        #[test]
        fn box_never_excludes_points_within_radius(
            center in coordinate(),
            radius_km in 0.0f64..50.0,
            bearing in 0.0f64..360.0,
            fraction in 0.0f64..=1.0,
        ) {
            // Walk along a great circle from the centre
            let angle = radius_km * fraction / EARTH_RADIUS_KM;
            let lat1 = center.lat().to_radians();
            let lon1 = center.lon().to_radians();
            let theta = bearing.to_radians();

            let lat2 = (lat1.sin() * angle.cos() + lat1.cos() * angle.sin() * theta.cos())
                .clamp(-1.0, 1.0)
                .asin();
            let lon2 = lon1
                + (theta.sin() * angle.sin() * lat1.cos())
                    .atan2(angle.cos() - lat1.sin() * lat2.sin());
            let lon2 = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;

            let point = Coordinate::new(lat2.to_degrees().clamp(-90.0, 90.0), lon2).unwrap();
            if distance_km(center, point) <= radius_km {
                let bbox = BoundingBox::around(center, radius_km);
                prop_assert!(
                    bbox.contains(point),
                    "{:?} within {} km of {:?} but outside {:?}",
                    point, radius_km, center, bbox
                );
            }
        }
    }
}
