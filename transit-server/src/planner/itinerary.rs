//! An itinerary: the ordered legs of one physical trip.

use geojson::FeatureCollection;

use crate::geometry::Point;
use crate::route::{Route, itinerary_collection};

use super::config::PlannerConfig;

/// Ordered legs of a trip. Line legs are ridden; zone legs are a tricycle
/// ride across the zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    legs: Vec<Route>,
}

impl Itinerary {
    pub fn new(legs: Vec<Route>) -> Self {
        Self { legs }
    }

    pub fn legs(&self) -> &[Route] {
        &self.legs
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Kilometres ridden on line legs.
    pub fn ridden_km(&self) -> f64 {
        self.legs.iter().map(Route::total_distance).sum()
    }

    /// Sum of per-leg fares.
    pub fn fare(&self, config: &PlannerConfig) -> f64 {
        self.legs
            .iter()
            .map(|leg| {
                if leg.is_tricycle() {
                    config.tricycle_fare
                } else {
                    config.line_fare(leg.total_distance())
                }
            })
            .sum()
    }

    /// Kilometres on foot: to the first line leg, between consecutive line
    /// legs, and from the last line leg. Walks to or from a zone leg are not
    /// counted since the tricycle covers them.
    pub fn walking_km(&self, source: Point, destination: Point) -> f64 {
        let Some((first, last)) = self.legs.first().zip(self.legs.last()) else {
            return 0.0;
        };

        let gap = |a: Option<Point>, b: Option<Point>| match (a, b) {
            (Some(a), Some(b)) => a.distance_km(b),
            _ => 0.0,
        };
        let line_end = |leg: &Route, end: Option<Point>| (!leg.is_tricycle()).then_some(end).flatten();

        let mut walking = gap(Some(source), line_end(first, first.first_point()));
        walking += self
            .legs
            .windows(2)
            .map(|pair| {
                gap(
                    line_end(&pair[0], pair[0].last_point()),
                    line_end(&pair[1], pair[1].first_point()),
                )
            })
            .sum::<f64>();
        walking += gap(line_end(last, last.last_point()), Some(destination));
        walking
    }

    /// Distance cost under the configured cost model.
    pub fn distance_cost(&self, source: Point, destination: Point, config: &PlannerConfig) -> f64 {
        let ridden = self.ridden_km();
        if config.cost_model.include_walking_in_distance {
            ridden + self.walking_km(source, destination)
        } else {
            ridden
        }
    }

    /// The legs as a GeoJSON collection, in travel order.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        itinerary_collection(&self.legs)
    }
}
