//! Trip assembly: turning a path of routes into concrete, walkable legs.
//!
//! Each route on the path is re-anchored at the rider's current position in
//! both directions of travel. The leg is cut where the next route first
//! becomes walkable (or where the destination is reached on the last route),
//! and the shorter direction wins.

use crate::geometry::{Point, closest_approach, segments_walkable};
use crate::route::{Route, Traversal};

use super::itinerary::Itinerary;

/// Where a trip starts and ends, and how far the rider may walk at each
/// point.
#[derive(Debug, Clone, Copy)]
pub struct TripEnds<'a> {
    pub source: Point,
    pub destination: Point,
    /// Tricycle zone containing the source, ridden before the first leg
    pub source_zone: Option<&'a Route>,
    /// Tricycle zone containing the destination, ridden after the last leg
    pub destination_zone: Option<&'a Route>,
    /// Radius for boarding the first route
    pub source_radius_km: f64,
    /// Radius for leaving the last route
    pub destination_radius_km: f64,
    /// Radius for walking between consecutive routes
    pub transfer_radius_km: f64,
}

/// Assembles the legs of one trip along `path`.
///
/// Returns `None` if the path is empty or any route cannot be anchored
/// within its radius. Zone routes on the path move the rider but add no
/// leg of their own.
pub fn merge_routes(path: &[Route], ends: &TripEnds<'_>) -> Option<Itinerary> {
    if path.is_empty() {
        return None;
    }

    let mut legs = Vec::with_capacity(path.len() + 2);
    if let Some(zone) = ends.source_zone {
        legs.push(zone.clone());
    }

    let mut position = ends.source;
    for (i, route) in path.iter().enumerate() {
        let radius = if i == 0 {
            ends.source_radius_km
        } else {
            ends.transfer_radius_km
        };
        let forward = route.different_start_point(position, Traversal::Forward, radius)?;
        let reverse = route.different_start_point(position, Traversal::Reverse, radius)?;

        let (leg, next_position) = match path.get(i + 1) {
            None => {
                let leg = shorter(
                    forward.split_from_source_to_point(ends.destination, ends.destination_radius_km),
                    reverse.split_from_source_to_point(ends.destination, ends.destination_radius_km),
                )?;
                let end = leg.last_point()?;
                (leg, end)
            }
            Some(successor) => {
                let forward = transfer_leg(&forward, successor, ends.transfer_radius_km);
                let reverse = transfer_leg(&reverse, successor, ends.transfer_radius_km);
                match (forward, reverse) {
                    (Some(f), Some(r)) if f.0.total_distance() > r.0.total_distance() => r,
                    (Some(f), _) => f,
                    (None, r) => r?,
                }
            }
        };

        if !route.is_tricycle() {
            legs.push(leg);
        }
        position = next_position;
    }

    if let Some(zone) = ends.destination_zone {
        legs.push(zone.clone());
    }
    Some(Itinerary::new(legs))
}

/// The shorter of two candidate legs; the forward one on a tie.
fn shorter(forward: Option<Route>, reverse: Option<Route>) -> Option<Route> {
    match (forward, reverse) {
        (Some(f), Some(r)) if f.total_distance() > r.total_distance() => Some(r),
        (Some(f), _) => Some(f),
        (None, r) => r,
    }
}

/// Rides `rotated` until one of its segments is walkable to `successor`.
///
/// Returns the leg, cut at the closest approach to the successor, and the
/// point on the successor where the rider arrives on foot.
fn transfer_leg(rotated: &Route, successor: &Route, walkable_km: f64) -> Option<(Route, Point)> {
    let (index, on_leg, on_successor) =
        rotated
            .segment_pairs()
            .enumerate()
            .find_map(|(index, (a1, a2))| {
                successor
                    .segment_pairs()
                    .find(|&(b1, b2)| segments_walkable(a1, a2, b1, b2, walkable_km))
                    .map(|(b1, b2)| {
                        let (on_leg, on_successor) = closest_approach(a1, a2, b1, b2);
                        (index, on_leg, on_successor)
                    })
            })?;

    let mut points = rotated.points()[..=index].to_vec();
    points.push(on_leg);
    Some((Route::line(rotated.name(), points), on_successor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon)
    }

    fn ends(source: Point, destination: Point) -> TripEnds<'static> {
        TripEnds {
            source,
            destination,
            source_zone: None,
            destination_zone: None,
            source_radius_km: 0.5,
            destination_radius_km: 0.5,
            transfer_radius_km: 0.5,
        }
    }

    fn route_a() -> Route {
        Route::line("A", vec![pt(0.0, 0.0), pt(0.0, 1.0)])
    }

    fn route_b() -> Route {
        Route::line("B", vec![pt(0.0, 1.0), pt(0.0, 2.0)])
    }

    fn names(itinerary: &Itinerary) -> Vec<&str> {
        itinerary.legs().iter().map(Route::name).collect()
    }

    #[test]
    fn two_routes_transfer_where_they_meet() {
        let itinerary = merge_routes(
            &[route_a(), route_b()],
            &ends(pt(0.0, 0.0), pt(0.0, 2.0)),
        )
        .unwrap();

        assert_eq!(names(&itinerary), vec!["A", "B"]);
        let legs = itinerary.legs();
        assert_eq!(legs[0].first_point(), Some(pt(0.0, 0.0)));
        assert_eq!(legs[0].last_point(), Some(pt(0.0, 1.0)));
        assert_eq!(legs[1].first_point(), Some(pt(0.0, 1.0)));
        assert_eq!(legs[1].last_point(), Some(pt(0.0, 2.0)));
    }

    #[test]
    fn transfer_walks_between_nearby_routes() {
        let a = Route::line("A", vec![pt(0.0, 0.0), pt(0.0, 0.01)]);
        let b = Route::line("B", vec![pt(0.002, 0.01), pt(0.002, 0.02)]);

        let itinerary = merge_routes(&[a, b], &ends(pt(0.0, 0.0), pt(0.002, 0.02))).unwrap();

        let legs = itinerary.legs();
        assert_eq!(legs[0].points(), &[pt(0.0, 0.0), pt(0.0, 0.01)]);
        assert_eq!(legs[1].first_point(), Some(pt(0.002, 0.01)));
        assert_eq!(legs[1].last_point(), Some(pt(0.002, 0.02)));
    }

    #[test]
    fn single_leg_prefers_shorter_direction() {
        let route = Route::line("L", vec![pt(0.0, 0.0), pt(0.0, 0.01), pt(0.0, 0.02)]);
        let itinerary =
            merge_routes(&[route], &ends(pt(0.0, 0.015), pt(0.0, 0.005))).unwrap();

        let leg = &itinerary.legs()[0];
        let expected = pt(0.0, 0.015).distance_km(pt(0.0, 0.005));
        assert!((leg.total_distance() - expected).abs() < 1e-6);
        assert_eq!(leg.points()[1], pt(0.0, 0.01));
    }

    #[test]
    fn unreachable_source_fails() {
        assert!(merge_routes(&[route_a()], &ends(pt(1.0, 0.0), pt(0.0, 1.0))).is_none());
    }

    #[test]
    fn unreachable_destination_fails() {
        assert!(merge_routes(&[route_a()], &ends(pt(0.0, 0.0), pt(1.0, 1.0))).is_none());
    }

    #[test]
    fn disconnected_successor_fails() {
        let far = Route::line("Far", vec![pt(1.0, 0.0), pt(1.0, 1.0)]);
        assert!(merge_routes(&[route_a(), far], &ends(pt(0.0, 0.0), pt(1.0, 1.0))).is_none());
    }

    #[test]
    fn empty_path_fails() {
        assert!(merge_routes(&[], &ends(pt(0.0, 0.0), pt(0.0, 1.0))).is_none());
    }

    #[test]
    fn zones_wrap_the_legs() {
        let source_zone = Route::zone(
            "Start Zone",
            vec![pt(0.0, 0.0), pt(0.0, -0.01), pt(-0.01, -0.01), pt(0.0, 0.0)],
        )
        .unwrap();
        let destination_zone = Route::zone(
            "End Zone",
            vec![pt(0.0, 1.0), pt(0.0, 1.01), pt(0.01, 1.01), pt(0.0, 1.0)],
        )
        .unwrap();

        let trip = TripEnds {
            source_zone: Some(&source_zone),
            destination_zone: Some(&destination_zone),
            ..ends(pt(0.0, 0.0), pt(0.0, 1.0))
        };
        let itinerary = merge_routes(&[route_a()], &trip).unwrap();

        assert_eq!(names(&itinerary), vec!["Start Zone", "A", "End Zone"]);
        assert!(itinerary.legs()[0].is_tricycle());
        assert!(itinerary.legs()[2].is_tricycle());
    }

    #[test]
    fn zone_on_path_adds_no_leg() {
        let zone = Route::zone(
            "Zone",
            vec![pt(0.0, 1.0), pt(0.005, 1.005), pt(0.0, 1.01), pt(0.0, 1.0)],
        )
        .unwrap();
        let onward = Route::line("C", vec![pt(0.0, 1.01), pt(0.0, 1.02)]);

        let itinerary = merge_routes(
            &[route_a(), zone, onward],
            &ends(pt(0.0, 0.0), pt(0.0, 1.02)),
        )
        .unwrap();

        assert_eq!(names(&itinerary), vec!["A", "C"]);
    }
}
