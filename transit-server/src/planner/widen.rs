//! Radius widening: retry a search with larger walking radii until a trip
//! turns up or the radii reach their ceiling.

use tracing::{debug, info};

use crate::geometry::Point;

use super::optimizer::{PlanError, PlanRequest, PlanResult, Planner};
use super::rank::Priority;

/// Outcome of a widening search.
#[derive(Debug, Clone, PartialEq)]
pub struct WidenedSearch {
    /// Result of the last attempt.
    pub result: PlanResult,

    /// Source walking radius used by the last attempt (km).
    pub source_radius_km: f64,

    /// Destination walking radius used by the last attempt (km).
    pub destination_radius_km: f64,

    /// Number of planner runs.
    pub attempts: usize,
}

/// Plans a trip, widening the walking radii until one is found.
///
/// Both radii start at the configured walkable distance. After an empty
/// attempt, a radius grows by one step if its end had no candidate routes;
/// if both ends had candidates, both grow. Radii never exceed the
/// configured ceiling, and the search stops once no radius can grow. An
/// empty final result is not an error.
pub fn search_with_widening(
    planner: &Planner<'_>,
    source: Point,
    destination: Point,
    priority: Priority,
) -> Result<WidenedSearch, PlanError> {
    let config = planner.config();
    let ceiling = config.max_allowable_km;
    let grow = |radius: f64| {
        if radius >= ceiling {
            radius
        } else {
            (radius + config.radius_step_km).min(ceiling)
        }
    };

    let mut source_radius_km = config.max_walkable_km;
    let mut destination_radius_km = config.max_walkable_km;
    let mut attempts = 0;

    loop {
        attempts += 1;
        let request = PlanRequest::new(source, destination, priority, config)
            .with_radii(source_radius_km, destination_radius_km);
        let result = planner.plan(&request)?;

        debug!(
            attempts,
            source_radius_km,
            destination_radius_km,
            itineraries = result.itineraries.len(),
            "widening attempt"
        );

        let no_source = result.source_routes.is_empty();
        let no_destination = result.destination_routes.is_empty();
        let (grow_source, grow_destination) = if no_source || no_destination {
            (no_source, no_destination)
        } else {
            (true, true)
        };

        let next_source = if grow_source { grow(source_radius_km) } else { source_radius_km };
        let next_destination = if grow_destination {
            grow(destination_radius_km)
        } else {
            destination_radius_km
        };

        let exhausted = next_source == source_radius_km && next_destination == destination_radius_km;
        if !result.itineraries.is_empty() || exhausted {
            info!(
                attempts,
                source_radius_km,
                destination_radius_km,
                itineraries = result.itineraries.len(),
                "search finished"
            );
            return Ok(WidenedSearch {
                result,
                source_radius_km,
                destination_radius_km,
                attempts,
            });
        }

        source_radius_km = next_source;
        destination_radius_km = next_destination;
    }
}
