//! Persisted network model: the route graph plus its shortest-path tables.

use std::path::Path;
use std::time::Instant;

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::planner::PlannerConfig;
use crate::route::{Route, itinerary_collection, routes_from_collection};

use super::{Graph, NetworkError, ShortestPaths, Weighting};

/// A route graph and the shortest paths computed over it.
///
/// Built offline, saved as JSON and loaded read-only by the server. The
/// shortest-path tables are indexed by the graph's node indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkModel {
    #[serde(default)]
    weighting: Weighting,
    graph: Graph,
    paths: ShortestPaths,
}

impl NetworkModel {
    /// Builds the graph over `routes` and computes its shortest paths.
    ///
    /// # Errors
    ///
    /// Returns `Err` if two routes share a name or a route is invalid.
    pub fn generate(
        routes: Vec<Route>,
        weighting: Weighting,
        config: &PlannerConfig,
    ) -> Result<Self, NetworkError> {
        let started = Instant::now();
        let graph = Graph::from_routes(routes, weighting, config)?;
        graph.validate()?;

        let paths = ShortestPaths::compute(&graph);
        info!(
            nodes = graph.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generated network model"
        );

        Ok(Self {
            weighting,
            graph,
            paths,
        })
    }

    /// Imports routes from a GeoJSON collection and generates the model.
    pub fn from_feature_collection(
        collection: &FeatureCollection,
        weighting: Weighting,
        config: &PlannerConfig,
    ) -> Result<Self, NetworkError> {
        let routes = routes_from_collection(collection)?;
        Self::generate(routes, weighting, config)
    }

    /// Assembles a model from parts, checking that they agree.
    pub fn from_parts(
        weighting: Weighting,
        graph: Graph,
        paths: ShortestPaths,
    ) -> Result<Self, NetworkError> {
        let model = Self {
            weighting,
            graph,
            paths,
        };
        model.validate()?;
        Ok(model)
    }

    /// Reads and validates a model file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let model: NetworkModel = serde_json::from_str(&contents)?;
        model.validate()?;

        info!(
            path = %path.display(),
            nodes = model.graph.len(),
            edges = model.graph.edges().len(),
            weighting = ?model.weighting,
            "loaded network model"
        );
        Ok(model)
    }

    /// Writes the model as JSON, creating parent directories if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), NetworkError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Checks graph integrity and that the tables cover exactly its nodes.
    pub fn validate(&self) -> Result<(), NetworkError> {
        self.graph.validate()?;
        self.paths.validate(self.graph.len())
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn paths(&self) -> &ShortestPaths {
        &self.paths
    }

    /// Owned copies of the routes along the shortest path between two
    /// routes. Empty when no path exists.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either route is unknown or the next-hop table is
    /// broken.
    pub fn path_routes(&self, from: &str, to: &str) -> Result<Vec<Route>, NetworkError> {
        let index = |name: &str| {
            self.graph
                .index_of(name)
                .ok_or_else(|| NetworkError::UnknownNode(name.to_string()))
        };

        let (from, to) = (index(from)?, index(to)?);
        self.paths
            .path(from, to)?
            .into_iter()
            .map(|hop| {
                self.graph
                    .node(hop)
                    .cloned()
                    .ok_or(NetworkError::InvalidNextHop {
                        from,
                        to,
                        hop,
                        len: self.graph.len(),
                    })
            })
            .collect()
    }

    /// The network's routes as a GeoJSON collection.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        itinerary_collection(self.graph.nodes())
    }
}
