//! Route type and its distance queries.

use serde::{Deserialize, Serialize};

use crate::geometry::{
    GeometryError, MIN_RING_POINTS, Point, distance_to_segment, point_in_polygon,
    segments_intersect, segments_walkable,
};

/// The geometry of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum Shape {
    /// A transit line ridden along its points
    Line(Vec<Point>),
    /// A closed tricycle catchment ring (first point repeated last)
    Zone(Vec<Point>),
}

/// A named route geometry.
///
/// # Examples
///
/// ```
/// use transit_server::geometry::Point;
/// use transit_server::route::Route;
///
/// let route = Route::line(
///     "Toril",
///     vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(0.0, 2.0)],
/// );
///
/// assert_eq!(route.segments().count(), 2);
/// assert!(route.distance_from_point(Point::new(0.0, 1.5)) < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    name: String,
    shape: Shape,
}

impl Route {
    /// Creates a line route.
    pub fn line(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Line(points),
        }
    }

    /// Creates a tricycle zone from a closed ring.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the ring has fewer than three points or is not closed.
    pub fn zone(name: impl Into<String>, ring: Vec<Point>) -> Result<Self, GeometryError> {
        let route = Self {
            name: name.into(),
            shape: Shape::Zone(ring),
        };
        route.validate()?;
        Ok(route)
    }

    /// Builds a route of the same kind as `self` over new points.
    pub(super) fn with_points(&self, points: Vec<Point>) -> Self {
        let shape = match self.shape {
            Shape::Line(_) => Shape::Line(points),
            Shape::Zone(_) => Shape::Zone(points),
        };
        Self {
            name: self.name.clone(),
            shape,
        }
    }

    /// Checks the zone ring invariant. Lines are always valid.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let Shape::Zone(ring) = &self.shape else {
            return Ok(());
        };
        if ring.len() < MIN_RING_POINTS {
            return Err(GeometryError::TooFewPoints {
                expected: MIN_RING_POINTS,
                found: ring.len(),
            });
        }
        if ring.first() != ring.last() {
            return Err(GeometryError::OpenRing);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The ordered points of the line, or the ring of the zone.
    pub fn points(&self) -> &[Point] {
        match &self.shape {
            Shape::Line(points) | Shape::Zone(points) => points,
        }
    }

    /// Returns true for tricycle zones.
    pub fn is_tricycle(&self) -> bool {
        matches!(self.shape, Shape::Zone(_))
    }

    pub fn first_point(&self) -> Option<Point> {
        self.points().first().copied()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points().last().copied()
    }

    /// Consecutive point pairs.
    pub(crate) fn segment_pairs(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points().windows(2).map(|w| (w[0], w[1]))
    }

    /// Decomposes the route into two-point line routes named `"<name> - <i>"`
    /// (1-based).
    pub fn segments(&self) -> impl Iterator<Item = Route> + '_ {
        self.segment_pairs()
            .enumerate()
            .map(|(i, (a, b))| Route::line(format!("{} - {}", self.name, i + 1), vec![a, b]))
    }

    /// Ridden length in kilometres. Zones have no line-haul length.
    pub fn total_distance(&self) -> f64 {
        match &self.shape {
            Shape::Zone(_) => 0.0,
            Shape::Line(_) => self.segment_pairs().map(|(a, b)| a.distance_km(b)).sum(),
        }
    }

    /// Distance in kilometres from `p` to the nearest segment, with that
    /// segment's index.
    ///
    /// A single-point route measures to its point; an empty route has no
    /// nearest segment.
    pub fn nearest_segment(&self, p: Point) -> Option<(usize, f64)> {
        let nearest = self
            .segment_pairs()
            .map(|(a, b)| distance_to_segment(p, a, b))
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            });

        nearest.or_else(|| self.first_point().map(|q| (0, p.distance_km(q))))
    }

    /// Distance in kilometres from `p` to the route. Infinite for empty routes.
    pub fn distance_from_point(&self, p: Point) -> f64 {
        self.nearest_segment(p).map_or(f64::INFINITY, |(_, d)| d)
    }

    /// Returns true if `p` lies inside this zone. Always false for lines.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the zone ring is open. Rings shorter than three points
    /// are treated as empty.
    pub fn is_inside(&self, p: Point) -> Result<bool, GeometryError> {
        match &self.shape {
            Shape::Line(_) => Ok(false),
            Shape::Zone(ring) if ring.len() < MIN_RING_POINTS => Ok(false),
            Shape::Zone(ring) => point_in_polygon(p, ring),
        }
    }

    /// Returns true if any segment pair properly crosses.
    pub fn intersects(&self, other: &Route) -> bool {
        self.segment_pairs().any(|(a1, a2)| {
            other
                .segment_pairs()
                .any(|(b1, b2)| segments_intersect(a1, a2, b1, b2))
        })
    }

    /// Returns true if a rider can transfer between the two routes on foot:
    /// they cross, or they pass closer than `walkable_km`.
    pub fn is_walkable_to(&self, other: &Route, walkable_km: f64) -> bool {
        self.segment_pairs().any(|(a1, a2)| {
            other
                .segment_pairs()
                .any(|(b1, b2)| segments_walkable(a1, a2, b1, b2, walkable_km))
        })
    }

    /// Shortest distance from any point of `self` to `other`; zero when the
    /// routes cross.
    pub fn approach_distance(&self, other: &Route) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        self.points()
            .iter()
            .map(|p| other.distance_from_point(*p))
            .fold(f64::INFINITY, f64::min)
    }

    /// The same route traversed end to start.
    pub fn reversed(&self) -> Route {
        let mut points = self.points().to_vec();
        points.reverse();
        self.with_points(points)
    }
}
