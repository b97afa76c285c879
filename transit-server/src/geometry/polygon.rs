//! Point-in-polygon test.

use super::{GeometryError, Point};

/// Minimum number of points in a closed ring (first point repeated last).
pub const MIN_RING_POINTS: usize = 3;

/// Crossing-number containment test over a closed ring.
///
/// Points lying exactly on an edge or a vertex count as inside.
///
/// # Errors
///
/// Returns `Err` if the ring has fewer than [`MIN_RING_POINTS`] points or its
/// first and last points differ.
pub fn point_in_polygon(p: Point, ring: &[Point]) -> Result<bool, GeometryError> {
    if ring.len() < MIN_RING_POINTS {
        return Err(GeometryError::TooFewPoints {
            expected: MIN_RING_POINTS,
            found: ring.len(),
        });
    }

    let first = ring[0];
    if Some(&first) != ring.last() {
        return Err(GeometryError::OpenRing);
    }

    let mut crossings = 0usize;
    let mut u1 = first.lat - p.lat;
    let mut v1 = first.lon - p.lon;

    for next in &ring[1..] {
        let v2 = next.lon - p.lon;

        // Edge entirely on one side of the horizontal through p
        if (v1 < 0.0 && v2 < 0.0) || (v1 > 0.0 && v2 > 0.0) {
            u1 = next.lat - p.lat;
            v1 = v2;
            continue;
        }

        let u2 = next.lat - p.lat;
        let f = u1 * v2 - u2 * v1;

        if v2 > 0.0 && v1 <= 0.0 {
            if f > 0.0 {
                crossings += 1;
            } else if f == 0.0 {
                return Ok(true);
            }
        } else if v1 > 0.0 && v2 <= 0.0 {
            if f < 0.0 {
                crossings += 1;
            } else if f == 0.0 {
                return Ok(true);
            }
        } else if (v2 == 0.0 && v1 < 0.0) || (v1 == 0.0 && v2 < 0.0) {
            if f == 0.0 {
                return Ok(true);
            }
        } else if v1 == 0.0 && v2 == 0.0 && ((u2 <= 0.0 && u1 >= 0.0) || (u1 <= 0.0 && u2 >= 0.0)) {
            return Ok(true);
        }

        u1 = u2;
        v1 = v2;
    }

    Ok(crossings % 2 == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon)
    }

    fn square() -> Vec<Point> {
        vec![
            pt(0.0, 0.0),
            pt(0.0, 2.0),
            pt(2.0, 2.0),
            pt(2.0, 0.0),
            pt(0.0, 0.0),
        ]
    }

    #[test]
    fn centroid_is_inside() {
        assert_eq!(point_in_polygon(pt(1.0, 1.0), &square()), Ok(true));
    }

    #[test]
    fn far_point_is_outside() {
        assert_eq!(point_in_polygon(pt(50.0, 50.0), &square()), Ok(false));
        assert_eq!(point_in_polygon(pt(1.0, 3.0), &square()), Ok(false));
        assert_eq!(point_in_polygon(pt(-1.0, 1.0), &square()), Ok(false));
    }

    #[test]
    fn vertex_and_edge_count_as_inside() {
        assert_eq!(point_in_polygon(pt(0.0, 0.0), &square()), Ok(true));
        assert_eq!(point_in_polygon(pt(2.0, 1.0), &square()), Ok(true));
        assert_eq!(point_in_polygon(pt(1.0, 2.0), &square()), Ok(true));
    }

    #[test]
    fn concave_ring() {
        // U shape opening towards +lat
        let ring = vec![
            pt(0.0, 0.0),
            pt(0.0, 3.0),
            pt(3.0, 3.0),
            pt(3.0, 2.0),
            pt(1.0, 2.0),
            pt(1.0, 1.0),
            pt(3.0, 1.0),
            pt(3.0, 0.0),
            pt(0.0, 0.0),
        ];
        assert_eq!(point_in_polygon(pt(2.0, 1.5), &ring), Ok(false));
        assert_eq!(point_in_polygon(pt(2.0, 0.5), &ring), Ok(true));
        assert_eq!(point_in_polygon(pt(0.5, 1.5), &ring), Ok(true));
    }

    #[test]
    fn open_ring_is_rejected() {
        let ring = vec![pt(0.0, 0.0), pt(0.0, 2.0), pt(2.0, 2.0), pt(2.0, 0.0)];
        assert_eq!(
            point_in_polygon(pt(1.0, 1.0), &ring),
            Err(GeometryError::OpenRing)
        );
    }

    #[test]
    fn ring_differing_in_one_coordinate_is_rejected() {
        let ring = vec![pt(0.0, 0.0), pt(0.0, 2.0), pt(2.0, 2.0), pt(0.0, 0.5)];
        assert_eq!(
            point_in_polygon(pt(1.0, 1.0), &ring),
            Err(GeometryError::OpenRing)
        );
    }

    #[test]
    fn short_ring_is_rejected() {
        let ring = vec![pt(0.0, 0.0), pt(0.0, 0.0)];
        assert!(matches!(
            point_in_polygon(pt(0.0, 0.0), &ring),
            Err(GeometryError::TooFewPoints { found: 2, .. })
        ));
    }
}
