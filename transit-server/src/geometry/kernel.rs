//! Segment primitives.
//!
//! Projection and crossing tests run in degree space; the resulting points
//! are then measured with the haversine distance.

use super::Point;

fn dot(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.0 + u.1 * v.1
}

/// Returns the point on segment `[a, b]` closest to `p`.
///
/// Uses the dot-product clamp: projections falling before `a` snap to `a`,
/// projections past `b` snap to `b`. Degenerate segments return `a`.
pub fn nearest_point_on_segment(a: Point, b: Point, p: Point) -> Point {
    let v = (b.lat - a.lat, b.lon - a.lon);
    let w = (p.lat - a.lat, p.lon - a.lon);

    let c1 = dot(w, v);
    if c1 <= 0.0 {
        return a;
    }

    let c2 = dot(v, v);
    if c2 <= c1 {
        return b;
    }

    let t = c1 / c2;
    Point::new(a.lat + t * v.0, a.lon + t * v.1)
}

/// Distance in kilometres from `p` to segment `[a, b]`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    p.distance_km(nearest_point_on_segment(a, b, p))
}

/// Parameter along `[a1, a2]` where it crosses `[b1, b2]`, if it does.
///
/// Both parameters must lie strictly inside `(0, 1)`. Parallel segments
/// (zero determinant) never cross, including collinear overlaps.
fn crossing_parameter(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<f64> {
    let (a, b, c, d) = (a1.lat, a1.lon, a2.lat, a2.lon);
    let (p, q, r, s) = (b1.lat, b1.lon, b2.lat, b2.lon);

    let det = (c - a) * (s - q) - (r - p) * (d - b);
    if det == 0.0 {
        return None;
    }

    let lambda = ((s - q) * (r - a) + (p - r) * (s - b)) / det;
    let gamma = ((b - d) * (r - a) + (c - a) * (s - b)) / det;

    (0.0 < lambda && lambda < 1.0 && 0.0 < gamma && gamma < 1.0).then_some(lambda)
}

/// Returns true if segments `[a1, a2]` and `[b1, b2]` properly cross.
///
/// Touching at an endpoint does not count.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    crossing_parameter(a1, a2, b1, b2).is_some()
}

/// Returns true if a rider can walk between the two segments.
///
/// Either they cross, or some endpoint of one lies closer than
/// `walkable_km` to the other segment.
pub fn segments_walkable(a1: Point, a2: Point, b1: Point, b2: Point, walkable_km: f64) -> bool {
    if segments_intersect(a1, a2, b1, b2) {
        return true;
    }

    let nearest = distance_to_segment(a1, b1, b2)
        .min(distance_to_segment(a2, b1, b2))
        .min(distance_to_segment(b1, a1, a2))
        .min(distance_to_segment(b2, a1, a2));

    nearest < walkable_km
}

/// Closest pair of points between segments `[a1, a2]` and `[b1, b2]`.
///
/// Returns `(on_a, on_b)`. Crossing segments return their crossing point
/// twice.
pub fn closest_approach(a1: Point, a2: Point, b1: Point, b2: Point) -> (Point, Point) {
    if let Some(t) = crossing_parameter(a1, a2, b1, b2) {
        let x = Point::new(a1.lat + t * (a2.lat - a1.lat), a1.lon + t * (a2.lon - a1.lon));
        return (x, x);
    }

    let candidates = [
        (a1, nearest_point_on_segment(b1, b2, a1)),
        (a2, nearest_point_on_segment(b1, b2, a2)),
        (nearest_point_on_segment(a1, a2, b1), b1),
        (nearest_point_on_segment(a1, a2, b2), b2),
    ];

    candidates
        .into_iter()
        .min_by(|x, y| x.0.distance_km(x.1).total_cmp(&y.0.distance_km(y.1)))
        .unwrap_or((a1, b1))
}
