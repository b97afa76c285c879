//! Geographic point type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Unit of a great-circle distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    /// Kilometres along the Earth's surface
    #[default]
    Kilometers,
    /// Central angle in degrees
    Degrees,
}

/// A position in decimal degrees.
///
/// Equality is exact coordinate match. Serialized as a `[lat, lon]` pair.
///
/// # Examples
///
/// ```
/// use transit_server::geometry::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(0.0, 1.0);
///
/// // One degree of longitude at the equator
/// assert!((a.distance_km(b) - 111.19).abs() < 0.01);
/// assert_eq!(a.distance_km(a), 0.0);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Point {
    /// Creates a point from latitude and longitude.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` using the haversine formula.
    pub fn distance_from(&self, other: Point, unit: DistanceUnit) -> f64 {
        let d_lat = (self.lat - other.lat).to_radians();
        let d_lon = (self.lon - other.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        // Rounding can push `a` just past 1 for antipodal points
        let a = a.clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        match unit {
            DistanceUnit::Kilometers => c * EARTH_RADIUS_KM,
            DistanceUnit::Degrees => c.to_degrees(),
        }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: Point) -> f64 {
        self.distance_from(other, DistanceUnit::Kilometers)
    }

    /// Returns true if both coordinates are finite and within valid ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<[f64; 2]> for Point {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.lat, p.lon]
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        let p = Point::new(7.07, 125.6);
        assert_eq!(p.distance_km(p), 0.0);
        assert_eq!(p.distance_from(p, DistanceUnit::Degrees), 0.0);
    }

    #[test]
    fn one_degree_at_equator() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 1.0);

        let km = a.distance_km(b);
        assert!((km - 111.195).abs() < 0.001, "got {km}");

        let deg = a.distance_from(b, DistanceUnit::Degrees);
        assert!((deg - 1.0).abs() < 1e-9, "got {deg}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 180.0);
        let d = a.distance_km(b);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn serializes_as_lat_lon_pair() {
        let p = Point::new(7.5, 125.25);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[7.5,125.25]");

        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn validity() {
        assert!(Point::new(7.0, 125.0).is_valid());
        assert!(!Point::new(91.0, 0.0).is_valid());
        assert!(!Point::new(0.0, -181.0).is_valid());
        assert!(!Point::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn display_is_lat_comma_lon() {
        assert_eq!(Point::new(1.5, -2.0).to_string(), "1.5,-2");
    }
}
