//! Trip search over a loaded network model.
//!
//! Picks candidate boarding and alighting routes near the two endpoints,
//! assembles a trip for every candidate pair along its shortest path, and
//! ranks the trips that survive.

use tracing::{debug, trace};

use crate::geometry::{GeometryError, Point};
use crate::network::{NetworkError, NetworkModel};
use crate::route::Route;

use super::assemble::{TripEnds, merge_routes};
use super::config::PlannerConfig;
use super::itinerary::Itinerary;
use super::rank::{Priority, deduplicate, rank_itineraries};

/// Error from trip planning.
///
/// Only malformed requests and defects in the network model are errors.
/// Unreachable endpoints produce an empty result instead.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Invalid plan request
    #[error("invalid plan request: {0}")]
    InvalidRequest(String),

    /// The network model is inconsistent
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A zone in the network model has an invalid ring
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Request for a trip between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRequest {
    pub source: Point,
    pub destination: Point,
    pub priority: Priority,

    /// How far the rider will walk to board the first route (km).
    pub source_radius_km: f64,

    /// How far the rider will walk from the last route (km).
    pub destination_radius_km: f64,
}

impl PlanRequest {
    /// Create a request using the configured walking radius at both ends.
    pub fn new(
        source: Point,
        destination: Point,
        priority: Priority,
        config: &PlannerConfig,
    ) -> Self {
        Self {
            source,
            destination,
            priority,
            source_radius_km: config.max_walkable_km,
            destination_radius_km: config.max_walkable_km,
        }
    }

    pub fn with_radii(mut self, source_km: f64, destination_km: f64) -> Self {
        self.source_radius_km = source_km;
        self.destination_radius_km = destination_km;
        self
    }

    /// Validate the plan request.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.source.is_valid() {
            return Err(PlanError::InvalidRequest(format!(
                "source {} is not a valid coordinate",
                self.source
            )));
        }
        if !self.destination.is_valid() {
            return Err(PlanError::InvalidRequest(format!(
                "destination {} is not a valid coordinate",
                self.destination
            )));
        }
        for radius in [self.source_radius_km, self.destination_radius_km] {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(PlanError::InvalidRequest(format!(
                    "walking radius {radius} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

/// Result of trip planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    /// Names of the routes the rider could board.
    pub source_routes: Vec<String>,

    /// Names of the routes the rider could leave from.
    pub destination_routes: Vec<String>,

    /// Assembled trips, ranked best-first.
    pub itineraries: Vec<Itinerary>,
}

impl PlanResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            source_routes: Vec::new(),
            destination_routes: Vec::new(),
            itineraries: Vec::new(),
        }
    }
}

/// One end of a trip after resolving tricycle zones.
struct Endpoint<'m> {
    /// Where the rider effectively starts or ends: the requested point, or
    /// a zone vertex next to a candidate route
    point: Point,
    zone: Option<&'m Route>,
    candidates: Vec<&'m Route>,
    radius_km: f64,
}

/// Trip planner over a shared, read-only network model.
pub struct Planner<'a> {
    model: &'a NetworkModel,
    config: &'a PlannerConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(model: &'a NetworkModel, config: &'a PlannerConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        self.config
    }

    /// Plan trips for a request at its walking radii.
    ///
    /// # Errors
    ///
    /// Returns `Err` for invalid coordinates or radii, or if the network
    /// model turns out to be inconsistent.
    pub fn plan(&self, request: &PlanRequest) -> Result<PlanResult, PlanError> {
        request.validate()?;

        let source = self.resolve_endpoint(request.source, request.source_radius_km)?;
        let destination = self.resolve_endpoint(request.destination, request.destination_radius_km)?;

        debug!(
            source_candidates = source.candidates.len(),
            destination_candidates = destination.candidates.len(),
            source_zone = source.zone.map(Route::name),
            destination_zone = destination.zone.map(Route::name),
            "resolved candidates"
        );

        let ends = TripEnds {
            source: source.point,
            destination: destination.point,
            source_zone: source.zone,
            destination_zone: destination.zone,
            source_radius_km: source.radius_km,
            destination_radius_km: destination.radius_km,
            transfer_radius_km: self.config.max_walkable_km,
        };

        let is_source_candidate =
            |route: &Route| source.candidates.iter().any(|c| c.name() == route.name());
        let (same_routes, destination_only): (Vec<&Route>, Vec<&Route>) = destination
            .candidates
            .iter()
            .copied()
            .partition(|route| is_source_candidate(*route));

        let mut itineraries = Vec::new();

        for route in &same_routes {
            let path = [(*route).clone()];
            if let Some(itinerary) = self.assemble(&path, &ends) {
                itineraries.push(itinerary);
            }
        }

        for from in &source.candidates {
            for to in &destination_only {
                let path = self.model.path_routes(from.name(), to.name())?;
                if path.is_empty() {
                    trace!(from = from.name(), to = to.name(), "no path between candidates");
                    continue;
                }
                if let Some(itinerary) = self.assemble(&path, &ends) {
                    itineraries.push(itinerary);
                }
            }
        }

        let found = itineraries.len();
        let mut itineraries = rank_itineraries(
            deduplicate(itineraries),
            request.priority,
            source.point,
            destination.point,
            self.config,
        );
        itineraries.truncate(self.config.max_results);

        debug!(
            found,
            returned = itineraries.len(),
            priority = %request.priority,
            "planned trips"
        );

        Ok(PlanResult {
            source_routes: names(&source.candidates),
            destination_routes: names(&destination.candidates),
            itineraries,
        })
    }

    /// Assembles one trip and drops it if it starts or ends out of reach.
    fn assemble(&self, path: &[Route], ends: &TripEnds<'_>) -> Option<Itinerary> {
        let Some(itinerary) = merge_routes(path, ends) else {
            trace!(path = ?path_names(path), "assembly failed");
            return None;
        };

        let legs = itinerary.legs();
        let (first, last) = legs.first().zip(legs.last())?;
        let reachable = first.distance_from_point(ends.source) <= ends.source_radius_km
            && last.distance_from_point(ends.destination) <= ends.destination_radius_km;

        if !reachable {
            trace!(path = ?path_names(path), "itinerary out of walking range");
            return None;
        }
        Some(itinerary)
    }

    /// The first tricycle zone containing `point`.
    fn containing_zone(&self, point: Point) -> Result<Option<&'a Route>, PlanError> {
        for route in self.model.graph().nodes() {
            if route.is_inside(point)? {
                return Ok(Some(route));
            }
        }
        Ok(None)
    }

    /// Finds the candidate routes for one end of the trip.
    ///
    /// Inside a zone, the candidates are the zone's line neighbours and the
    /// rider moves to the zone vertex closest to one of them. Otherwise they
    /// are the lines within `radius_km` of the point.
    fn resolve_endpoint(&self, point: Point, radius_km: f64) -> Result<Endpoint<'a>, PlanError> {
        let graph = self.model.graph();

        let Some(zone) = self.containing_zone(point)? else {
            let candidates = graph
                .nodes()
                .iter()
                .filter(|route| !route.is_tricycle() && route.distance_from_point(point) <= radius_km)
                .collect();
            return Ok(Endpoint {
                point,
                zone: None,
                candidates,
                radius_km,
            });
        };

        let candidates: Vec<&Route> = graph
            .find_neighbors(zone.name())
            .into_iter()
            .filter(|route| !route.is_tricycle())
            .collect();

        let walkable_km = self.config.max_walkable_km;
        let boarding = zone
            .points()
            .iter()
            .map(|vertex| {
                let nearest = candidates
                    .iter()
                    .map(|route| route.distance_from_point(*vertex))
                    .fold(f64::INFINITY, f64::min);
                (*vertex, nearest)
            })
            .filter(|&(_, d)| d <= walkable_km)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(point, |(vertex, _)| vertex);

        Ok(Endpoint {
            point: boarding,
            zone: Some(zone),
            candidates,
            radius_km: radius_km.max(walkable_km),
        })
    }
}

fn names(routes: &[&Route]) -> Vec<String> {
    routes.iter().map(|r| r.name().to_string()).collect()
}

fn path_names(path: &[Route]) -> Vec<&str> {
    path.iter().map(Route::name).collect()
}
