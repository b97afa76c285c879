//! Anchoring an arbitrary point onto a route, and re-anchored slices.

use crate::geometry::{Point, distance_to_segment, nearest_point_on_segment};

use super::Route;

/// Direction in which a route's points are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    #[default]
    Forward,
    Reverse,
}

/// Where a point snaps onto a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Projection of the query point onto the anchor segment
    pub point: Point,
    /// Index of the anchor segment in traversal order
    pub segment_index: usize,
    /// First endpoint of the anchor segment in traversal order
    pub start: Point,
    /// Second endpoint of the anchor segment in traversal order
    pub end: Point,
    /// Distance in kilometres from the query point to the anchor segment
    pub distance_km: f64,
}

/// Finds the anchor of `p` on an ordered point sequence.
///
/// Walks the segments in order until one lies within `radius_km`, then keeps
/// advancing only while the distance to `p` strictly improves. The result is
/// the first local minimum after entering the radius, not the global one.
fn anchor_in_sequence(points: &[Point], p: Point, radius_km: f64) -> Option<Anchor> {
    let mut segments = points
        .windows(2)
        .enumerate()
        .map(|(i, w)| (i, w[0], w[1], distance_to_segment(p, w[0], w[1])));

    let (mut index, mut start, mut end, mut distance) =
        segments.by_ref().find(|&(_, _, _, d)| d <= radius_km)?;

    for (i, a, b, d) in segments {
        if d >= distance {
            break;
        }
        (index, start, end, distance) = (i, a, b, d);
    }

    Some(Anchor {
        point: nearest_point_on_segment(start, end, p),
        segment_index: index,
        start,
        end,
        distance_km: distance,
    })
}

impl Route {
    /// The route's points in traversal order.
    fn ordered_points(&self, traversal: Traversal) -> Vec<Point> {
        let mut points = self.points().to_vec();
        if traversal == Traversal::Reverse {
            points.reverse();
        }
        points
    }

    /// Snaps `p` onto this route, walking in the given direction.
    ///
    /// Returns `None` if no segment ever comes within `radius_km` of `p`.
    pub fn nearest_point_from_route(
        &self,
        p: Point,
        traversal: Traversal,
        radius_km: f64,
    ) -> Option<Anchor> {
        anchor_in_sequence(&self.ordered_points(traversal), p, radius_km)
    }

    /// The route re-started at its nearest approach to `p`.
    ///
    /// The points are rotated so the anchor segment's second endpoint comes
    /// first, and the snapped point is prepended. Closed rings stay closed:
    /// the duplicated closing point is dropped before rotating and the snapped
    /// point is appended as the new closing point.
    ///
    /// Returns `None` if no segment lies within `radius_km` of `p`.
    pub fn different_start_point(
        &self,
        p: Point,
        traversal: Traversal,
        radius_km: f64,
    ) -> Option<Route> {
        let ordered = self.ordered_points(traversal);
        let anchor = anchor_in_sequence(&ordered, p, radius_km)?;
        let start = anchor.segment_index + 1;

        let mut points = Vec::with_capacity(ordered.len() + 2);
        points.push(anchor.point);

        let closed = ordered.len() > 2 && ordered.first() == ordered.last();
        if closed {
            let cycle = &ordered[..ordered.len() - 1];
            let start = start % cycle.len();
            points.extend_from_slice(&cycle[start..]);
            points.extend_from_slice(&cycle[..start]);
            points.push(anchor.point);
        } else {
            points.extend_from_slice(&ordered[start..]);
            points.extend_from_slice(&ordered[..start]);
        }

        Some(self.with_points(points))
    }

    /// The prefix of this route ending where `p` snaps onto it.
    ///
    /// Keeps every point up to the anchor segment's first endpoint, then the
    /// snapped point. The result is always a line.
    pub fn split_from_source_to_point(&self, p: Point, radius_km: f64) -> Option<Route> {
        let anchor = self.nearest_point_from_route(p, Traversal::Forward, radius_km)?;

        let mut points = self.points()[..=anchor.segment_index].to_vec();
        points.push(anchor.point);

        Some(Route::line(self.name(), points))
    }

    /// The section of this route from the approach to `from` to the approach
    /// to `to`, walked forward from `from`.
    pub fn split_from_point_to_point(
        &self,
        from: Point,
        to: Point,
        radius_km: f64,
    ) -> Option<Route> {
        self.different_start_point(from, Traversal::Forward, radius_km)?
            .split_from_source_to_point(to, radius_km)
    }
}
